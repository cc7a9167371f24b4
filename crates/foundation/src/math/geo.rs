/// Geographic coordinate in WGS84 degrees, altitude in meters.
///
/// A coordinate is valid when both angles are finite and in range
/// (latitude in [-90, 90], longitude in [-180, 180]). Invalid coordinates
/// are filtered out at path ingestion and never stored in cached geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: Some(altitude),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Geographic bounding rectangle between a north-west and a south-east corner.
///
/// A rectangle crosses the antimeridian when the west edge lies east of the
/// east edge (`top_left.longitude > bottom_right.longitude`); intersection
/// tests account for that by splitting the longitude span at the wrap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoRectangle {
    pub top_left: GeoCoordinate,
    pub bottom_right: GeoCoordinate,
}

impl GeoRectangle {
    pub fn new(top_left: GeoCoordinate, bottom_right: GeoCoordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// The whole-world rectangle. Used as the conservative fallback when a
    /// viewport cannot be inverse-projected.
    pub fn world() -> Self {
        Self::new(GeoCoordinate::new(90.0, -180.0), GeoCoordinate::new(-90.0, 180.0))
    }

    /// Bounding rectangle of a coordinate sequence, or `None` when empty.
    ///
    /// Longitudes are bounded naively (min..max, no wrap minimization),
    /// matching the leftmost-point convention used for geometry wrapping.
    pub fn bounding(coords: &[GeoCoordinate]) -> Option<Self> {
        let first = coords.first()?;
        let mut north = first.latitude;
        let mut south = first.latitude;
        let mut west = first.longitude;
        let mut east = first.longitude;
        for c in &coords[1..] {
            north = north.max(c.latitude);
            south = south.min(c.latitude);
            west = west.min(c.longitude);
            east = east.max(c.longitude);
        }
        Some(Self::new(
            GeoCoordinate::new(north, west),
            GeoCoordinate::new(south, east),
        ))
    }

    fn latitude_overlap(&self, other: &Self) -> bool {
        self.bottom_right.latitude <= other.top_left.latitude
            && other.bottom_right.latitude <= self.top_left.latitude
    }

    /// Longitude span as up to two non-wrapping [west, east] intervals.
    fn lon_spans(&self) -> [Option<(f64, f64)>; 2] {
        let west = self.top_left.longitude;
        let east = self.bottom_right.longitude;
        if west <= east {
            [Some((west, east)), None]
        } else {
            // Crosses the antimeridian: split at +/-180.
            [Some((west, 180.0)), Some((-180.0, east))]
        }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        if !self.latitude_overlap(other) {
            return false;
        }
        for a in self.lon_spans().into_iter().flatten() {
            for b in other.lon_spans().into_iter().flatten() {
                if a.0 <= b.1 && b.0 <= a.1 {
                    return true;
                }
            }
        }
        false
    }
}
