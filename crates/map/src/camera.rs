use foundation::math::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Camera state driving the viewport transform.
///
/// This is a value type: viewport changes replace it wholesale, it is never
/// partially mutated in place. Angles are in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom_level: f64,
    #[serde(default)]
    pub bearing_deg: f64,
    #[serde(default)]
    pub tilt_deg: f64,
    #[serde(default)]
    pub roll_deg: f64,
}

impl CameraData {
    pub fn new(center: GeoCoordinate, zoom_level: f64) -> Self {
        Self {
            center_latitude: center.latitude,
            center_longitude: center.longitude,
            zoom_level,
            bearing_deg: 0.0,
            tilt_deg: 0.0,
            roll_deg: 0.0,
        }
    }

    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.center_latitude, self.center_longitude)
    }

    pub fn with_bearing(mut self, bearing_deg: f64) -> Self {
        self.bearing_deg = bearing_deg;
        self
    }

    pub fn with_tilt(mut self, tilt_deg: f64) -> Self {
        self.tilt_deg = tilt_deg;
        self
    }

    pub fn with_roll(mut self, roll_deg: f64) -> Self {
        self.roll_deg = roll_deg;
        self
    }
}

impl Default for CameraData {
    fn default() -> Self {
        Self::new(GeoCoordinate::new(0.0, 0.0), 9.0)
    }
}

/// What the active map/projection supports.
///
/// Items consult these to decide whether tilt/roll transforms force
/// continuous per-frame geometry regeneration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCapabilities {
    pub minimum_zoom: f64,
    pub maximum_zoom: f64,
    pub supports_bearing: bool,
    pub supports_tilting: bool,
    pub supports_rolling: bool,
    pub minimum_tilt_deg: f64,
    pub maximum_tilt_deg: f64,
}

impl Default for CameraCapabilities {
    fn default() -> Self {
        Self {
            minimum_zoom: 0.0,
            maximum_zoom: 20.0,
            supports_bearing: false,
            supports_tilting: false,
            supports_rolling: false,
            minimum_tilt_deg: 0.0,
            maximum_tilt_deg: 0.0,
        }
    }
}

impl CameraCapabilities {
    /// Clamp requested camera state to what the map supports.
    /// Unsupported transforms reset to zero rather than failing.
    pub fn constrain(&self, camera: CameraData) -> CameraData {
        let mut out = camera;
        out.zoom_level = camera.zoom_level.clamp(self.minimum_zoom, self.maximum_zoom);
        out.bearing_deg = if self.supports_bearing { camera.bearing_deg } else { 0.0 };
        out.tilt_deg = if self.supports_tilting {
            camera.tilt_deg.clamp(self.minimum_tilt_deg, self.maximum_tilt_deg)
        } else {
            0.0
        };
        out.roll_deg = if self.supports_rolling { camera.roll_deg } else { 0.0 };
        out
    }
}
