use serde::{Deserialize, Serialize};

/// Rendering style of a map type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapStyle {
    NoMap,
    Street,
    SatelliteDay,
    SatelliteNight,
    Terrain,
    Hybrid,
    Transit,
}

/// Metadata describing one map type offered by the tile provider.
///
/// Passed through the facade untouched; the geometry core only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapType {
    pub style: MapStyle,
    pub name: String,
    pub mobile: bool,
    pub map_id: u32,
}

impl MapType {
    pub fn new(style: MapStyle, name: impl Into<String>, mobile: bool, map_id: u32) -> Self {
        Self {
            style,
            name: name.into(),
            mobile,
            map_id,
        }
    }
}

impl Default for MapType {
    fn default() -> Self {
        Self::new(MapStyle::NoMap, "", false, 0)
    }
}
