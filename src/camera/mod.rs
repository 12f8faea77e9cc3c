//! Camera module: device probing and single-frame capture.
//!
//! - Device probing via [`first_active_device`]
//! - One-shot capture via [`capture_snapshot`]
//! - Backend seam via [`CameraBackend`] / [`CameraHandle`]

mod backend;
mod probe;
mod snapshot;
mod types;

pub use backend::{CameraBackend, CameraHandle, NokhwaBackend};
pub use probe::{first_active_device, DEFAULT_MAX_DEVICES};
pub use snapshot::{capture_snapshot, capture_snapshot_with_warmup, WARMUP_DELAY};
pub use types::{CameraError, Frame, BYTES_PER_PIXEL};
