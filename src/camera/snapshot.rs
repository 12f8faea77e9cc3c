//! Single-frame capture and encoding.
//!
//! Produces one JPEG-compressed frame from the first available camera,
//! returned as a base64 string ready for embedding in a request payload.

use std::thread;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use super::backend::CameraBackend;
use super::probe::{first_active_device, DEFAULT_MAX_DEVICES};
use super::types::{CameraError, Frame};

/// Fixed delay between opening the camera and reading the frame, giving
/// auto-exposure and white balance time to settle. A heuristic, not a
/// correctness requirement.
pub const WARMUP_DELAY: Duration = Duration::from_secs(2);

/// JPEG quality used when compressing the captured frame.
const JPEG_QUALITY: u8 = 90;

/// Capture one frame from the first available camera and return it as a
/// base64-encoded JPEG.
///
/// Probes device indices `0..DEFAULT_MAX_DEVICES`, reopens the first one
/// that responded, waits [`WARMUP_DELAY`], reads a single frame, and
/// encodes it. The device handle is released on every exit path.
///
/// # Errors
/// * `CameraError::NoDevices` - No device opened during probing
/// * `CameraError::OpenFailed` - The probed device could not be reopened
/// * `CameraError::CaptureFailed` - The frame read returned no data
/// * `CameraError::EncodeFailed` - JPEG encoding failed
pub fn capture_snapshot(backend: &dyn CameraBackend) -> Result<String, CameraError> {
    capture_snapshot_with_warmup(backend, WARMUP_DELAY)
}

/// Like [`capture_snapshot`], but with an explicit warm-up interval.
pub fn capture_snapshot_with_warmup(
    backend: &dyn CameraBackend,
    warmup: Duration,
) -> Result<String, CameraError> {
    let index = first_active_device(backend, DEFAULT_MAX_DEVICES).ok_or(CameraError::NoDevices)?;

    // The probe handle is already closed, so the device is opened a
    // second time here. Another process can claim it in between; that
    // surfaces as an OpenFailed despite the successful probe.
    let mut handle = backend.open(index)?;

    if !warmup.is_zero() {
        thread::sleep(warmup);
    }

    let frame = handle.read_frame()?;
    drop(handle);

    let jpeg = encode_jpeg(&frame)?;
    Ok(STANDARD.encode(&jpeg))
}

/// Compress an RGB frame to JPEG bytes.
fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>, CameraError> {
    let image = RgbImage::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(
        || {
            CameraError::EncodeFailed(format!(
                "frame buffer length {} does not match {}x{}",
                frame.data.len(),
                frame.width,
                frame.height
            ))
        },
    )?;

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&image)
        .map_err(|e| CameraError::EncodeFailed(e.to_string()))?;
    Ok(jpeg)
}
