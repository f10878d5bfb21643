//! WASM bindings for rsmockup
//!
//! This crate provides JavaScript-friendly API for:
//! - Fitting an uploaded image onto the phone screen texture
//! - Holding the current screen texture as a revocable object URL
//! - Exporting the rendered mockup canvas as PNG
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { MockupScreen, MockupExport } from 'rsmockup-wasm';
//!
//! await init();
//!
//! const screen = new MockupScreen();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! textureLoader.load(screen.setImage(bytes));
//!
//! // Back to the bundled texture (revokes the previous URL)
//! screen.reset();
//!
//! // Export the WebGL canvas pixels
//! const png = MockupExport.png(imageData.data, imageData.width, imageData.height);
//! download(png, MockupExport.fileName());
//! ```

use mockup_core::{
    export_png, mockup_file_name, FittedImage, ImageFitter, SourceImage, TargetSpec,
    DEFAULT_SCREEN_TEXTURE,
};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Blob URL for an encoded image
///
/// The URL is revoked exactly once, by `release()` or when the value is
/// dropped (including `free()` from JavaScript). A failed revocation keeps
/// the URL so a later `release()` or the drop can retry it.
#[wasm_bindgen]
pub struct ObjectUrl {
    url: Option<String>,
}

impl ObjectUrl {
    /// Wrap `bytes` in a Blob of type `mime_type` and create its URL
    fn create(bytes: &[u8], mime_type: &str) -> Result<ObjectUrl, JsValue> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);

        let options = BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;
        Ok(ObjectUrl { url: Some(url) })
    }
}

#[wasm_bindgen]
impl ObjectUrl {
    /// The blob URL, or undefined once released
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> Option<String> {
        self.url.clone()
    }

    /// Whether the URL has been revoked
    #[wasm_bindgen(getter, js_name = isReleased)]
    pub fn is_released(&self) -> bool {
        self.url.is_none()
    }

    /// Revoke the URL. Further calls do nothing.
    pub fn release(&mut self) -> Result<(), JsValue> {
        if let Some(url) = self.url.as_deref() {
            Url::revoke_object_url(url)?;
            self.url = None;
        }
        Ok(())
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        // Failures are only observable through release()
        let _ = self.release();
    }
}

/// Result of fitting an image onto the screen canvas
#[wasm_bindgen]
pub struct FittedScreen {
    inner: FittedImage,
}

#[wasm_bindgen]
impl FittedScreen {
    /// Canvas width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Canvas height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter, js_name = drawWidth)]
    pub fn draw_width(&self) -> f64 {
        self.inner.placement().draw_width
    }

    #[wasm_bindgen(getter, js_name = drawHeight)]
    pub fn draw_height(&self) -> f64 {
        self.inner.placement().draw_height
    }

    #[wasm_bindgen(getter, js_name = offsetX)]
    pub fn offset_x(&self) -> f64 {
        self.inner.placement().offset_x
    }

    #[wasm_bindgen(getter, js_name = offsetY)]
    pub fn offset_y(&self) -> f64 {
        self.inner.placement().offset_y
    }

    /// MIME type of the encoded bytes
    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// Encoded image bytes (Uint8Array)
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes().to_vec()
    }

    /// Create a blob URL for display or download
    ///
    /// @returns ObjectUrl - call release() (or free()) when no longer shown
    #[wasm_bindgen(js_name = toObjectUrl)]
    pub fn to_object_url(&self) -> Result<ObjectUrl, JsValue> {
        ObjectUrl::create(self.inner.bytes(), self.inner.mime_type())
    }
}

/// Fits uploaded images onto the phone screen canvas
#[wasm_bindgen]
pub struct ScreenFitter {
    inner: ImageFitter,
}

#[wasm_bindgen]
impl ScreenFitter {
    /// Fitter for the iPhone 13 Pro screen (1542x3334, black, JPEG 0.92)
    #[wasm_bindgen(constructor)]
    pub fn new() -> ScreenFitter {
        ScreenFitter {
            inner: ImageFitter::default(),
        }
    }

    /// Create fitter from JSON configuration
    ///
    /// @param json - Target spec JSON string
    /// @returns ScreenFitter instance
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<ScreenFitter, JsValue> {
        let spec = TargetSpec::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(ScreenFitter {
            inner: ImageFitter::new(spec),
        })
    }

    /// Create fitter from a configuration object
    ///
    /// @param config - { targetWidth, targetHeight, backgroundColor, outputFormat }
    /// @returns ScreenFitter instance
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<ScreenFitter, JsValue> {
        let spec: TargetSpec = serde_wasm_bindgen::from_value(config)?;
        spec.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(ScreenFitter {
            inner: ImageFitter::new(spec),
        })
    }

    /// Decode and fit an image
    ///
    /// @param data - JPEG or PNG file bytes (Uint8Array)
    /// @returns FittedScreen
    pub fn fit(&self, data: &[u8]) -> Result<FittedScreen, JsValue> {
        let inner = fit_bytes(&self.inner, data)?;
        Ok(FittedScreen { inner })
    }
}

impl Default for ScreenFitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Current screen texture of the mockup
///
/// Holds either the bundled default texture or the object URL of a fitted
/// user image. Replacing or resetting the image releases the previous URL.
#[wasm_bindgen]
pub struct MockupScreen {
    fitter: ImageFitter,
    custom: Option<ObjectUrl>,
}

#[wasm_bindgen]
impl MockupScreen {
    /// Screen showing the default texture
    #[wasm_bindgen(constructor)]
    pub fn new() -> MockupScreen {
        MockupScreen {
            fitter: ImageFitter::default(),
            custom: None,
        }
    }

    /// Screen that fits images with a custom spec
    ///
    /// @param json - Target spec JSON string
    #[wasm_bindgen(js_name = withSpec)]
    pub fn with_spec(json: &str) -> Result<MockupScreen, JsValue> {
        let spec = TargetSpec::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(MockupScreen {
            fitter: ImageFitter::new(spec),
            custom: None,
        })
    }

    /// Fit an uploaded image and use it as the screen texture
    ///
    /// On failure the current texture is kept.
    ///
    /// @param data - JPEG or PNG file bytes (Uint8Array)
    /// @returns URL of the new texture
    #[wasm_bindgen(js_name = setImage)]
    pub fn set_image(&mut self, data: &[u8]) -> Result<String, JsValue> {
        let fitted = fit_bytes(&self.fitter, data)?;
        let object_url = ObjectUrl::create(fitted.bytes(), fitted.mime_type())?;
        let url = object_url.url().unwrap_or_default();

        // Dropping the previous handle revokes its URL
        self.custom = Some(object_url);
        Ok(url)
    }

    /// Go back to the default texture, releasing the custom one
    ///
    /// If the URL cannot be revoked the custom texture stays in place.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        if let Some(current) = self.custom.as_mut() {
            current.release()?;
        }
        self.custom = None;
        Ok(())
    }

    /// URL to load as the screen texture
    #[wasm_bindgen(js_name = textureUrl)]
    pub fn texture_url(&self) -> String {
        self.custom
            .as_ref()
            .and_then(ObjectUrl::url)
            .unwrap_or_else(|| DEFAULT_SCREEN_TEXTURE.to_string())
    }

    /// Whether a user image is shown
    #[wasm_bindgen(js_name = hasCustomImage)]
    pub fn has_custom_image(&self) -> bool {
        self.custom.is_some()
    }
}

impl Default for MockupScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// PNG export of the rendered mockup canvas
#[wasm_bindgen]
pub struct MockupExport;

#[wasm_bindgen]
impl MockupExport {
    /// Encode canvas pixels as PNG with transparency
    ///
    /// @param rgba - RGBA pixels (e.g. ImageData.data)
    /// @param width - Canvas width
    /// @param height - Canvas height
    /// @returns PNG bytes (Uint8Array)
    pub fn png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        export_png(width, height, rgba).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Download name stamped with the current time
    ///
    /// @returns e.g. "iphone-mockup-1700000000000.png"
    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name() -> String {
        mockup_file_name(js_sys::Date::now() as u64)
    }
}

fn fit_bytes(fitter: &ImageFitter, data: &[u8]) -> Result<FittedImage, JsValue> {
    let source = SourceImage::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    fitter
        .fit(&source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Errors and blob URLs go through JS imports, so these only run under wasm-bindgen-test
#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([50, 100, 150, 255]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[wasm_bindgen_test]
    fn test_fit_geometry() {
        let fitter = ScreenFitter::from_json(r#"{ "targetWidth": 100, "targetHeight": 100 }"#)
            .unwrap();
        let fitted = fitter.fit(&png_bytes(200, 100)).unwrap();

        assert_eq!(fitted.width(), 100);
        assert_eq!(fitted.height(), 100);
        assert_eq!(fitted.draw_width(), 200.0);
        assert_eq!(fitted.offset_x(), -50.0);
        assert_eq!(fitted.offset_y(), 0.0);
        assert_eq!(fitted.mime_type(), "image/jpeg");
    }

    #[wasm_bindgen_test]
    fn test_default_texture() {
        let mut screen = MockupScreen::new();
        assert_eq!(screen.texture_url(), "/screenip12.jpg");
        assert!(!screen.has_custom_image());

        screen.reset().unwrap();
        assert_eq!(screen.texture_url(), "/screenip12.jpg");
    }

    fn small_screen() -> MockupScreen {
        MockupScreen::with_spec(r#"{ "targetWidth": 30, "targetHeight": 60 }"#).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_set_image_shows_custom_texture() {
        let mut screen = small_screen();
        let url = screen.set_image(&png_bytes(20, 10)).unwrap();

        assert!(url.starts_with("blob:"));
        assert!(screen.has_custom_image());
        assert_eq!(screen.texture_url(), url);
    }

    #[wasm_bindgen_test]
    fn test_set_image_replaces_previous_url() {
        let mut screen = small_screen();
        let first = screen.set_image(&png_bytes(20, 10)).unwrap();
        let second = screen.set_image(&png_bytes(10, 20)).unwrap();

        assert_ne!(first, second);
        assert_eq!(screen.texture_url(), second);
    }

    #[wasm_bindgen_test]
    fn test_failed_set_image_keeps_custom_texture() {
        let mut screen = small_screen();
        let url = screen.set_image(&png_bytes(20, 10)).unwrap();

        assert!(screen.set_image(b"not an image at all").is_err());
        assert_eq!(screen.texture_url(), url);
    }

    #[wasm_bindgen_test]
    fn test_reset_returns_to_default_texture() {
        let mut screen = small_screen();
        screen.set_image(&png_bytes(20, 10)).unwrap();

        screen.reset().unwrap();
        assert!(!screen.has_custom_image());
        assert_eq!(screen.texture_url(), DEFAULT_SCREEN_TEXTURE);
    }

    #[wasm_bindgen_test]
    fn test_object_url_release_is_idempotent() {
        let fitter = ScreenFitter::from_json(r#"{ "targetWidth": 8, "targetHeight": 8 }"#).unwrap();
        let fitted = fitter.fit(&png_bytes(4, 4)).unwrap();

        let mut handle = fitted.to_object_url().unwrap();
        assert!(handle.url().is_some_and(|url| url.starts_with("blob:")));
        assert!(!handle.is_released());

        handle.release().unwrap();
        assert!(handle.is_released());
        assert_eq!(handle.url(), None);

        handle.release().unwrap();
        assert!(handle.is_released());
    }

    #[wasm_bindgen_test]
    fn test_set_image_rejects_garbage() {
        let mut screen = MockupScreen::new();
        assert!(screen.set_image(&[0u8; 16]).is_err());
        assert!(!screen.has_custom_image());
    }

    #[wasm_bindgen_test]
    fn test_export_png_rejects_short_buffer() {
        assert!(MockupExport::png(&[0u8; 3], 1, 1).is_err());
        assert!(MockupExport::png(&[0u8; 4], 1, 1).is_ok());
    }
}
