use foundation::math::Vec2;

use crate::camera::CameraData;

/// Pixel size of one map tile; the world is `TILE_SIZE_PX * 2^zoom` pixels wide.
pub const TILE_SIZE_PX: f64 = 256.0;

// Below this, the tilt foreshortening is not invertible.
const MIN_TILT_COS: f64 = 1e-6;

/// The viewport-dependent transform between static-projection (unit Web
/// Mercator) space and screen pixels.
///
/// Forward order: translate to the camera center, scale to world pixels,
/// bearing rotation, tilt foreshortening, roll rotation, translate to the
/// screen center. [`Viewport::screen_to_mercator`] is the exact inverse and
/// returns `None` where the tilt makes the transform singular.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    center: Vec2,
    scale_px: f64,
    bearing_rad: f64,
    tilt_cos: f64,
    roll_rad: f64,
    width_px: f64,
    height_px: f64,
}

fn rotate(v: Vec2, rad: f64) -> Vec2 {
    let (sin, cos) = rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

impl Viewport {
    pub fn new(camera: &CameraData, width_px: f64, height_px: f64) -> Self {
        Self {
            center: foundation::math::coordinate_to_mercator(camera.center()),
            scale_px: TILE_SIZE_PX * camera.zoom_level.exp2(),
            bearing_rad: camera.bearing_deg.to_radians(),
            tilt_cos: camera.tilt_deg.to_radians().cos(),
            roll_rad: camera.roll_deg.to_radians(),
            width_px,
            height_px,
        }
    }

    pub fn width(&self) -> f64 {
        self.width_px
    }

    pub fn height(&self) -> f64 {
        self.height_px
    }

    /// Camera center in static-projection space.
    pub fn center_mercator(&self) -> Vec2 {
        self.center
    }

    /// Shift a static-projection point by whole world widths so it lands on
    /// the wrap of the world nearest the camera center.
    pub fn wrap_to_center(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - (p.x - self.center.x).round(), p.y)
    }

    pub fn mercator_to_screen(&self, p: Vec2) -> Vec2 {
        let d = (p - self.center) * self.scale_px;
        let b = rotate(d, -self.bearing_rad);
        let t = Vec2::new(b.x, b.y * self.tilt_cos);
        let r = rotate(t, -self.roll_rad);
        r + Vec2::new(self.width_px / 2.0, self.height_px / 2.0)
    }

    pub fn screen_to_mercator(&self, p: Vec2) -> Option<Vec2> {
        if self.tilt_cos < MIN_TILT_COS {
            return None;
        }
        let r = p - Vec2::new(self.width_px / 2.0, self.height_px / 2.0);
        let t = rotate(r, self.roll_rad);
        let b = Vec2::new(t.x, t.y / self.tilt_cos);
        let d = rotate(b, self.bearing_rad);
        Some(self.center + d * (1.0 / self.scale_px))
    }
}
