use super::{GeoCoordinate, Vec2};

/// Latitude where the Web Mercator unit square ends.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

const TAU: f64 = 2.0 * std::f64::consts::PI;

/// Viewport-independent ("static") projection of a coordinate onto the
/// Web Mercator unit square: x in [0, 1] west to east, y in [0, 1] north
/// to south. Latitudes beyond the Mercator domain clamp to the square edge.
pub fn coordinate_to_mercator(c: GeoCoordinate) -> Vec2 {
    let x = (c.longitude + 180.0) / 360.0;
    let lat = c.latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let phi = lat.to_radians();
    let y = 0.5 - (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln() / TAU;
    Vec2::new(x, y)
}

/// Inverse of [`coordinate_to_mercator`].
///
/// Returns `None` outside the unit square's y range (the projection is
/// singular at the poles); x wraps back into [-180, 180] degrees.
pub fn mercator_to_coordinate(p: Vec2) -> Option<GeoCoordinate> {
    if !p.x.is_finite() || !p.y.is_finite() || p.y < 0.0 || p.y > 1.0 {
        return None;
    }
    let x = p.x - p.x.floor();
    let longitude = x * 360.0 - 180.0;
    let latitude = (2.0 * ((0.5 - p.y) * TAU).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    Some(GeoCoordinate::new(latitude, longitude))
}
