use foundation::math::{
    GeoCoordinate, GeoRectangle, Vec2, coordinate_to_mercator, mercator_to_coordinate,
};

use crate::camera::{CameraCapabilities, CameraData};
use crate::events::ViewportChangeEvent;
use crate::map_type::MapType;
use crate::viewport::Viewport;

/// Hook invoked when panning/zooming settles, so a tile engine can prefetch
/// imagery around the resting camera. A hint, not a correctness requirement.
pub type PrefetchHook = Box<dyn FnMut(&CameraData)>;

/// The query surface renderable items use: coordinate/screen conversions,
/// the viewport-independent static projection, visible-region computation,
/// and camera/map-type metadata.
///
/// Conversion results are snapshots valid for the current render pass only;
/// the camera may be replaced before the next one.
pub struct GeoMap {
    camera: CameraData,
    capabilities: CameraCapabilities,
    active_map_type: MapType,
    width_px: f64,
    height_px: f64,
    viewport: Viewport,
    prefetch: Option<PrefetchHook>,
}

impl GeoMap {
    pub fn new(capabilities: CameraCapabilities, map_type: MapType) -> Self {
        let camera = capabilities.constrain(CameraData::default());
        Self {
            camera,
            capabilities,
            active_map_type: map_type,
            width_px: 0.0,
            height_px: 0.0,
            viewport: Viewport::new(&camera, 0.0, 0.0),
            prefetch: None,
        }
    }

    pub fn width(&self) -> f64 {
        self.width_px
    }

    pub fn height(&self) -> f64 {
        self.height_px
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) -> ViewportChangeEvent {
        self.width_px = width_px;
        self.height_px = height_px;
        self.viewport = Viewport::new(&self.camera, width_px, height_px);
        ViewportChangeEvent::size_changed(self.camera)
    }

    pub fn camera_data(&self) -> CameraData {
        self.camera
    }

    /// Replace the camera wholesale. The request is constrained to the map's
    /// capabilities first; the returned event classifies what changed.
    pub fn set_camera_data(&mut self, camera: CameraData) -> ViewportChangeEvent {
        let constrained = self.capabilities.constrain(camera);
        let event = ViewportChangeEvent::camera_diff(&self.camera, &constrained);
        self.camera = constrained;
        self.viewport = Viewport::new(&self.camera, self.width_px, self.height_px);
        event
    }

    pub fn camera_capabilities(&self) -> CameraCapabilities {
        self.capabilities
    }

    /// Signal that panning/zooming has settled; triggers the prefetch hook.
    pub fn camera_stopped(&mut self) {
        if let Some(hook) = &mut self.prefetch {
            hook(&self.camera);
        }
    }

    pub fn set_prefetch_hook(&mut self, hook: PrefetchHook) {
        self.prefetch = Some(hook);
    }

    pub fn active_map_type(&self) -> &MapType {
        &self.active_map_type
    }

    pub fn set_active_map_type(&mut self, map_type: MapType) {
        self.active_map_type = map_type;
    }

    pub fn minimum_zoom(&self) -> f64 {
        self.capabilities.minimum_zoom
    }

    /// The current viewport transform. Geometry caches use this directly to
    /// keep wrapped paths continuous; single-coordinate queries go through
    /// the conversion methods below.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Static projection of a coordinate. Must not depend on the current
    /// viewport (center, zoom, etc); recomputed only when a path changes.
    pub fn coordinate_to_static_projection(&self, coordinate: GeoCoordinate) -> Vec2 {
        coordinate_to_mercator(coordinate)
    }

    /// Screen position of a static-projection point. Composing this with
    /// [`GeoMap::coordinate_to_static_projection`] is equivalent to
    /// [`GeoMap::coordinate_to_screen_position`].
    pub fn static_projection_to_screen_position(&self, position: Vec2) -> Vec2 {
        self.viewport
            .mercator_to_screen(self.viewport.wrap_to_center(position))
    }

    pub fn coordinate_to_screen_position(
        &self,
        coordinate: GeoCoordinate,
        clip_to_viewport: bool,
    ) -> Option<Vec2> {
        if !coordinate.is_valid() {
            return None;
        }
        let pos = self
            .static_projection_to_screen_position(self.coordinate_to_static_projection(coordinate));
        if clip_to_viewport && !self.on_screen(pos) {
            return None;
        }
        Some(pos)
    }

    pub fn screen_position_to_coordinate(
        &self,
        position: Vec2,
        clip_to_viewport: bool,
    ) -> Option<GeoCoordinate> {
        if clip_to_viewport && !self.on_screen(position) {
            return None;
        }
        let mercator = self.viewport.screen_to_mercator(position)?;
        mercator_to_coordinate(mercator)
    }

    /// Geographic rectangle covering the screen, derived from the corner
    /// inverse projections. Items use it to cheaply decide visibility before
    /// committing to full geometry recomputation. Falls back to the whole
    /// world when a corner cannot be inverse-projected, so gating stays
    /// conservative.
    pub fn visible_region(&self) -> GeoRectangle {
        let top_left = self.screen_position_to_coordinate(Vec2::new(0.0, 0.0), false);
        let bottom_right =
            self.screen_position_to_coordinate(Vec2::new(self.width_px, self.height_px), false);
        match (top_left, bottom_right) {
            (Some(tl), Some(br)) => GeoRectangle::new(tl, br),
            _ => GeoRectangle::world(),
        }
    }

    fn on_screen(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width_px && pos.y >= 0.0 && pos.y <= self.height_px
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::GeoMap;
    use crate::camera::{CameraCapabilities, CameraData};
    use crate::map_type::{MapStyle, MapType};
    use foundation::math::{GeoCoordinate, Vec2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn bearing_map() -> GeoMap {
        let caps = CameraCapabilities {
            supports_bearing: true,
            ..CameraCapabilities::default()
        };
        let mut map = GeoMap::new(caps, MapType::default());
        map.resize(800.0, 600.0);
        map
    }

    #[test]
    fn two_stage_projection_composes_to_direct() {
        let mut map = bearing_map();
        map.set_camera_data(CameraData::new(GeoCoordinate::new(48.1, 11.5), 7.0).with_bearing(33.0));
        let c = GeoCoordinate::new(48.2, 11.7);

        let staged = map
            .static_projection_to_screen_position(map.coordinate_to_static_projection(c));
        let direct = map.coordinate_to_screen_position(c, false).expect("valid");
        assert_close(staged.x, direct.x, 1e-9);
        assert_close(staged.y, direct.y, 1e-9);
    }

    #[test]
    fn screen_round_trip_at_center() {
        let mut map = bearing_map();
        map.set_camera_data(CameraData::new(GeoCoordinate::new(-20.0, 130.0), 8.0));
        let center = map
            .screen_position_to_coordinate(Vec2::new(400.0, 300.0), false)
            .expect("center is on the map");
        assert_close(center.latitude, -20.0, 1e-9);
        assert_close(center.longitude, 130.0, 1e-9);
    }

    #[test]
    fn clip_to_viewport_rejects_offscreen() {
        let map = bearing_map();
        assert!(map.screen_position_to_coordinate(Vec2::new(-5.0, 10.0), true).is_none());
        assert!(map.screen_position_to_coordinate(Vec2::new(5.0, 10.0), true).is_some());

        // A coordinate far outside the viewport projects unclipped but not clipped.
        let far = GeoCoordinate::new(0.0, 90.0);
        assert!(map.coordinate_to_screen_position(far, false).is_some());
        assert!(map.coordinate_to_screen_position(far, true).is_none());
    }

    #[test]
    fn invalid_coordinate_never_projects() {
        let map = bearing_map();
        let invalid = GeoCoordinate::new(120.0, 0.0);
        assert!(map.coordinate_to_screen_position(invalid, false).is_none());
    }

    #[test]
    fn visible_region_brackets_the_center() {
        let mut map = bearing_map();
        map.set_camera_data(CameraData::new(GeoCoordinate::new(10.0, 20.0), 8.0));
        let region = map.visible_region();
        assert!(region.top_left.latitude > 10.0);
        assert!(region.bottom_right.latitude < 10.0);
        assert!(region.top_left.longitude < 20.0);
        assert!(region.bottom_right.longitude > 20.0);
    }

    #[test]
    fn visible_region_degrades_to_world_when_zoomed_out() {
        let mut map = bearing_map();
        // At zoom 0 the 600px tall viewport extends past the mercator square.
        map.set_camera_data(CameraData::new(GeoCoordinate::new(0.0, 0.0), 0.0));
        let region = map.visible_region();
        assert_eq!(region, foundation::math::GeoRectangle::world());
    }

    #[test]
    fn set_camera_data_constrains_and_classifies() {
        let mut map = bearing_map();
        let event = map.set_camera_data(
            CameraData::new(GeoCoordinate::new(0.0, 0.0), 9.0)
                .with_bearing(90.0)
                .with_tilt(45.0),
        );
        assert!(event.bearing_changed);
        // Tilt is unsupported: constrained away, so not reported as changed.
        assert!(!event.tilt_changed);
        assert_eq!(map.camera_data().tilt_deg, 0.0);
    }

    #[test]
    fn resize_reports_size_change_only() {
        let mut map = bearing_map();
        let event = map.resize(1024.0, 768.0);
        assert!(event.map_size_changed);
        assert!(!event.zoom_level_changed);
        assert!(!event.center_changed);
        assert_eq!(map.width(), 1024.0);
        assert_eq!(map.height(), 768.0);
    }

    #[test]
    fn camera_stopped_triggers_prefetch_hook() {
        let mut map = bearing_map();
        let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        map.set_prefetch_hook(Box::new(move |camera| {
            sink.borrow_mut().push(camera.zoom_level);
        }));

        map.camera_stopped();
        map.set_camera_data(CameraData::new(GeoCoordinate::new(0.0, 0.0), 12.0));
        map.camera_stopped();
        assert_eq!(*seen.borrow(), vec![9.0, 12.0]);
    }

    #[test]
    fn map_type_passthrough() {
        let mut map = bearing_map();
        assert_eq!(map.active_map_type().style, MapStyle::NoMap);
        map.set_active_map_type(MapType::new(MapStyle::Terrain, "terrain", false, 7));
        assert_eq!(map.active_map_type().name, "terrain");
        assert_eq!(map.minimum_zoom(), 0.0);
    }
}
