//! Camera backend abstraction and the nokhwa implementation.
//!
//! Device access goes through [`CameraBackend`] so that probing and
//! capture can be exercised against fake devices in tests. The production
//! backend is [`NokhwaBackend`].

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::types::{CameraError, Frame};

/// Default capture resolution requested from the device (640x480).
///
/// The camera may negotiate a different resolution; whatever it delivers
/// is used as-is.
const REQUESTED_WIDTH: u32 = 640;
const REQUESTED_HEIGHT: u32 = 480;
const REQUESTED_FPS: u32 = 30;

/// Opens camera devices by index.
pub trait CameraBackend {
    /// Open the device at `index` and start its stream.
    ///
    /// A non-existent index fails with an error; it never panics. The
    /// returned handle owns the open session and releases it on drop.
    fn open(&self, index: u32) -> Result<Box<dyn CameraHandle>, CameraError>;
}

/// An open capture session on a single device.
///
/// Dropping the handle closes the device, so release is guaranteed on
/// every exit path of the caller.
pub trait CameraHandle {
    /// Read one frame from the device.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;
}

/// Production camera backend built on nokhwa.
#[derive(Debug, Default)]
pub struct NokhwaBackend;

impl CameraBackend for NokhwaBackend {
    fn open(&self, index: u32) -> Result<Box<dyn CameraHandle>, CameraError> {
        let camera_index = CameraIndex::Index(index);
        let mut camera = open_camera_with_fallback(&camera_index, index)?;

        camera.open_stream().map_err(|e| CameraError::OpenFailed {
            index,
            reason: e.to_string(),
        })?;

        log::debug!(
            "opened camera {} at {}x{}",
            index,
            camera.resolution().width(),
            camera.resolution().height()
        );

        Ok(Box::new(NokhwaHandle { camera }))
    }
}

struct NokhwaHandle {
    camera: Camera,
}

impl CameraHandle for NokhwaHandle {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        // decode_image handles the camera's native format (MJPEG, YUYV,
        // NV12, ...) and converts to RGB.
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let resolution = buffer.resolution();

        Ok(Frame {
            data: decoded.into_raw(),
            width: resolution.width(),
            height: resolution.height(),
        })
    }
}

impl Drop for NokhwaHandle {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(index: &CameraIndex, raw_index: u32) -> Result<Camera, CameraError> {
    // Format strategies in order of preference:
    // 1. Closest match with NV12 (common on macOS)
    // 2. Closest match with MJPEG (widely supported)
    // 3. Highest resolution available (let camera decide format)
    let requested_resolution =
        nokhwa::utils::Resolution::new(REQUESTED_WIDTH, REQUESTED_HEIGHT);
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::NV12,
            REQUESTED_FPS,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::MJPEG,
            REQUESTED_FPS,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    let e = last_error.expect("format_attempts is non-empty");
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed {
            index: raw_index,
            reason: e.to_string(),
        })
    }
}
