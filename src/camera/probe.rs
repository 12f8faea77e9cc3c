//! Device probing: find the first camera that opens.

use super::backend::CameraBackend;

/// Default upper bound on device indices to probe.
pub const DEFAULT_MAX_DEVICES: u32 = 3;

/// Find the first device index in `0..max_devices` that opens.
///
/// Each candidate is opened and immediately closed again (the handle is
/// dropped before this function returns), so no device is left open
/// regardless of outcome. Returns `None` when no device opens.
pub fn first_active_device(backend: &dyn CameraBackend, max_devices: u32) -> Option<u32> {
    for index in 0..max_devices {
        match backend.open(index) {
            Ok(handle) => {
                drop(handle);
                log::debug!("probe: camera {} is available", index);
                return Some(index);
            }
            Err(e) => {
                log::debug!("probe: camera {} unavailable: {}", index, e);
            }
        }
    }
    None
}
