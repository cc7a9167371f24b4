use serde::{Deserialize, Serialize};

use crate::camera::CameraData;

/// Describes one viewport change: the new camera state plus which fields
/// actually changed. Produced by the facade on camera mutation or resize,
/// fanned out to every item, and consumed once (never persisted).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportChangeEvent {
    pub camera: CameraData,
    pub center_changed: bool,
    pub zoom_level_changed: bool,
    pub bearing_changed: bool,
    pub tilt_changed: bool,
    pub roll_changed: bool,
    pub map_size_changed: bool,
}

impl ViewportChangeEvent {
    /// Classify a wholesale camera replacement.
    pub fn camera_diff(old: &CameraData, new: &CameraData) -> Self {
        Self {
            camera: *new,
            center_changed: old.center_latitude != new.center_latitude
                || old.center_longitude != new.center_longitude,
            zoom_level_changed: old.zoom_level != new.zoom_level,
            bearing_changed: old.bearing_deg != new.bearing_deg,
            tilt_changed: old.tilt_deg != new.tilt_deg,
            roll_changed: old.roll_deg != new.roll_deg,
            map_size_changed: false,
        }
    }

    /// A pure resize: camera unchanged, pixel size changed.
    pub fn size_changed(camera: CameraData) -> Self {
        Self {
            camera,
            center_changed: false,
            zoom_level_changed: false,
            bearing_changed: false,
            tilt_changed: false,
            roll_changed: false,
            map_size_changed: true,
        }
    }

    pub fn any_changed(&self) -> bool {
        self.center_changed
            || self.zoom_level_changed
            || self.bearing_changed
            || self.tilt_changed
            || self.roll_changed
            || self.map_size_changed
    }
}
