//! Camera types and data structures.

use std::fmt;

/// Bytes per pixel for RGB24 frame data.
pub const BYTES_PER_PIXEL: usize = 3;

/// A single captured camera frame.
///
/// Pixel data is tightly packed RGB24. Frames are transient: one is
/// produced per capture, encoded, and discarded.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    /// Expected length of `data` for this frame's dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug)]
pub enum CameraError {
    /// No camera opened successfully during probing
    NoDevices,
    /// Camera failed to open despite a successful probe
    OpenFailed { index: u32, reason: String },
    /// Camera permission denied (macOS)
    PermissionDenied,
    /// Frame read returned no data
    CaptureFailed(String),
    /// JPEG encoding of a captured frame failed
    EncodeFailed(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoDevices => write!(f, "No active camera found"),
            CameraError::OpenFailed { index, reason } => {
                write!(f, "Cannot open camera {}: {}", index, reason)
            }
            CameraError::PermissionDenied => {
                write!(
                    f,
                    "Camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera"
                )
            }
            CameraError::CaptureFailed(msg) => write!(f, "Failed to capture image: {}", msg),
            CameraError::EncodeFailed(msg) => write!(f, "Failed to encode frame: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_expected_len() {
        let frame = Frame {
            data: vec![0; 6], // 2 RGB pixels
            width: 2,
            height: 1,
        };
        assert_eq!(frame.expected_len(), 6);
        assert_eq!(frame.data.len(), frame.expected_len());
    }

    #[test]
    fn test_camera_error_display() {
        assert_eq!(
            format!("{}", CameraError::NoDevices),
            "No active camera found"
        );
        assert_eq!(
            format!(
                "{}",
                CameraError::OpenFailed {
                    index: 1,
                    reason: "busy".to_string()
                }
            ),
            "Cannot open camera 1: busy"
        );
        assert!(format!("{}", CameraError::PermissionDenied).contains("permission denied"));
        assert_eq!(
            format!("{}", CameraError::CaptureFailed("no data".to_string())),
            "Failed to capture image: no data"
        );
        assert_eq!(
            format!("{}", CameraError::EncodeFailed("bad buffer".to_string())),
            "Failed to encode frame: bad buffer"
        );
    }
}
