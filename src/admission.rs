//! Validation and normalization of uploaded photos before they reach a model.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use log::{debug, info};
use std::io::Cursor;

use crate::error::AnalysisError;

const JPEG_QUALITY: u8 = 90;

/// Limits applied while admitting an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Uploads whose encoded size exceeds this are downsampled
    pub resize_threshold_bytes: usize,
    /// Longest allowed edge after downsampling
    pub max_dimension: u32,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            resize_threshold_bytes: 4 * 1024 * 1024,
            max_dimension: 1024,
        }
    }
}

/// A decoded photo in 3-channel RGB, ready to be encoded for transmission
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pixels: RgbImage,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Encode the pixels as JPEG for a provider request
    pub fn to_payload(&self) -> Result<ImagePayload, AnalysisError> {
        let mut buf = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
            .encode_image(&self.pixels)
            .map_err(|e| AnalysisError::InvalidImage(format!("Failed to encode image: {}", e)))?;

        Ok(ImagePayload {
            mime_type: "image/jpeg".to_string(),
            data: buf.into_inner(),
        })
    }
}

/// Encoded image bytes as sent to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL form used by chat-completion style APIs
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Decode `bytes`, convert to RGB and downsample oversized uploads.
///
/// Fails with [`AnalysisError::InvalidImage`] when the bytes are not a
/// supported raster format. Images within `max_dimension` are never upscaled.
pub fn admit(bytes: &[u8], policy: &AdmissionPolicy) -> Result<NormalizedImage, AnalysisError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnalysisError::InvalidImage(format!("Failed to read image: {}", e)))?;

    if reader.format().is_none() {
        return Err(AnalysisError::InvalidImage(
            "Could not detect image format".to_string(),
        ));
    }

    let decoded = reader
        .decode()
        .map_err(|e| AnalysisError::InvalidImage(format!("Failed to decode image: {}", e)))?;

    debug!(
        "Decoded {}x{} image ({:?}, {} bytes)",
        decoded.width(),
        decoded.height(),
        decoded.color(),
        bytes.len()
    );

    let decoded = if bytes.len() > policy.resize_threshold_bytes {
        downsample(decoded, policy.max_dimension)
    } else {
        decoded
    };

    Ok(NormalizedImage {
        pixels: decoded.to_rgb8(),
    })
}

fn downsample(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return image;
    }

    // resize() keeps the aspect ratio and fits within the bounds
    let resized = image.resize(max_dimension, max_dimension, FilterType::Lanczos3);
    info!(
        "Resized large image from {}x{} to {}x{}",
        image.width(),
        image.height(),
        resized.width(),
        resized.height()
    );
    resized
}
