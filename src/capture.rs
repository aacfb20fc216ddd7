//! Photo capture and upload: data URLs and the scoped camera session.
//!
//! A `CaptureSession` mutably borrows its `Camera`, so only one session can
//! be open at a time. The device is released when the session is dropped,
//! whether or not a photo was taken.

use std::path::Path;

use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use thiserror::Error;

/// JPEG quality for captured frames.
pub const CAPTURE_JPEG_QUALITY: u8 = 80;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Frame capture failed: {0}")]
    FrameCapture(String),

    #[error("Frame buffer is {actual} bytes, expected {expected} for {width}x{height} RGB")]
    InvalidFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("JPEG encoding failed: {0}")]
    Encoding(String),

    #[error("Not a base64 data URL")]
    InvalidDataUrl,

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ──────────────────────────────────────────────
// Data URLs
// ──────────────────────────────────────────────

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// The base64 part of an image reference: everything after the first comma,
/// or the whole string when there is no comma (already bare base64).
pub fn base64_payload(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, payload)) => payload,
        None => image,
    }
}

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn parse(url: &str) -> Result<Self, CaptureError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or(CaptureError::InvalidDataUrl)?;
        let (meta, payload) = rest.split_once(',').ok_or(CaptureError::InvalidDataUrl)?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or(CaptureError::InvalidDataUrl)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| CaptureError::InvalidDataUrl)?;
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// Read an image file into a data URL, typed by its extension.
pub fn load_image_file(path: &Path) -> Result<String, CaptureError> {
    let mime = mime_guess::from_path(path)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .ok_or_else(|| CaptureError::UnsupportedFile(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    tracing::debug!(mime = %mime, size = bytes.len(), "Image file loaded");
    Ok(to_data_url(mime.essence_str(), &bytes))
}

// ──────────────────────────────────────────────
// Camera
// ──────────────────────────────────────────────

/// One RGB8 frame, row-major.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// A physical or virtual capture device (rear camera preferred).
pub trait CaptureDevice {
    fn start(&mut self) -> Result<(), CaptureError>;
    fn grab(&mut self) -> Result<Frame, CaptureError>;
    /// Must be safe to call on an already-stopped device.
    fn stop(&mut self);
}

pub struct Camera<D: CaptureDevice> {
    device: D,
}

impl<D: CaptureDevice> Camera<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Acquire the device. On failure nothing stays acquired.
    pub fn open(&mut self) -> Result<CaptureSession<'_, D>, CaptureError> {
        if let Err(e) = self.device.start() {
            tracing::warn!(error = %e, "Camera could not be started");
            self.device.stop();
            return Err(e);
        }
        tracing::debug!("Camera session opened");
        Ok(CaptureSession {
            device: &mut self.device,
        })
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

/// An open camera. Dropping it releases the device.
pub struct CaptureSession<'a, D: CaptureDevice> {
    device: &'a mut D,
}

impl<D: CaptureDevice> CaptureSession<'_, D> {
    /// Take a photo as a JPEG data URL and close the session.
    pub fn capture_photo(self) -> Result<String, CaptureError> {
        let frame = self.device.grab()?;
        let jpeg = encode_jpeg(&frame, CAPTURE_JPEG_QUALITY)?;
        tracing::info!(
            width = frame.width,
            height = frame.height,
            jpeg_size = jpeg.len(),
            "Photo captured"
        );
        Ok(to_data_url("image/jpeg", &jpeg))
    }
}

impl<D: CaptureDevice> Drop for CaptureSession<'_, D> {
    fn drop(&mut self) {
        self.device.stop();
        tracing::debug!("Camera session released");
    }
}

fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.width == 0 || frame.height == 0 || frame.rgb.len() != expected {
        return Err(CaptureError::InvalidFrame {
            width: frame.width,
            height: frame.height,
            expected,
            actual: frame.rgb.len(),
        });
    }

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(&frame.rgb, frame.width, frame.height, ColorType::Rgb8)
        .map_err(|e| CaptureError::Encoding(e.to_string()))?;
    Ok(out)
}
