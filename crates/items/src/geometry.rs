use foundation::bounds::Aabb2;
use foundation::math::{GeoCoordinate, Vec2};
use map::GeoMap;

/// Cached projected geometry for one polyline path.
///
/// Holds the static-projection point sequence ("source") and the
/// screen-space geometry derived from it, with two independent dirty flags:
/// - source dirty: the source points must be re-derived from the path's
///   static projection (marking source dirty also stales the screen side);
/// - screen dirty: screen points must be re-derived from the source points
///   under the current viewport.
///
/// Recomputation is lazy: flags are raised on mutation and resolved on the
/// next render pass, so repeated mutations between passes coalesce into a
/// single recomputation. The recompute counters exist so callers (and tests)
/// can observe exactly that.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineGeometry {
    source_points: Vec<Vec2>,
    screen_points: Vec<Vec2>,
    screen_bounds: Aabb2,
    first_screen_point: Vec2,
    stroke_width: f64,
    source_dirty: bool,
    screen_dirty: bool,
    preserve_geometry: bool,
    reference_longitude: f64,
    source_recomputes: u64,
    screen_recomputes: u64,
}

impl Default for PolylineGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl PolylineGeometry {
    pub fn new() -> Self {
        Self {
            source_points: Vec::new(),
            screen_points: Vec::new(),
            screen_bounds: Aabb2::empty(),
            first_screen_point: Vec2::new(0.0, 0.0),
            stroke_width: 0.0,
            source_dirty: false,
            screen_dirty: false,
            preserve_geometry: false,
            reference_longitude: 0.0,
            source_recomputes: 0,
            screen_recomputes: 0,
        }
    }

    /// Stale the source points. Screen geometry derives from them, so it is
    /// staled as well. No recomputation happens until the next render pass.
    pub fn mark_source_dirty(&mut self) {
        self.source_dirty = true;
        self.screen_dirty = true;
    }

    /// Stale the screen geometry only; source points stay untouched.
    pub fn mark_screen_dirty(&mut self) {
        self.screen_dirty = true;
    }

    /// Clear both flags after a successful paint.
    pub fn mark_clean(&mut self) {
        self.source_dirty = false;
        self.screen_dirty = false;
    }

    pub fn is_source_dirty(&self) -> bool {
        self.source_dirty
    }

    pub fn is_screen_dirty(&self) -> bool {
        self.screen_dirty
    }

    /// When enabled, source points are wrapped by whole world widths toward
    /// `reference_longitude`, so a path crossing the antimeridian renders as
    /// one continuous shape instead of splitting at the wrap boundary. The
    /// reference must stay stable frame to frame; items use the leftmost
    /// longitude of their path.
    pub fn set_preserve_geometry(&mut self, preserve: bool, reference_longitude: f64) {
        self.preserve_geometry = preserve;
        self.reference_longitude = reference_longitude;
    }

    /// Re-derive the source points from the path's static projection.
    ///
    /// No-op unless source dirty. Idempotent: repeated calls without an
    /// intervening mutation yield identical output. The input is trusted to
    /// contain only valid, already-filtered entries (validation happens at
    /// path ingestion, never here in the render path).
    pub fn update_source_points(&mut self, map: &GeoMap, static_path: &[Vec2]) {
        if !self.source_dirty {
            return;
        }
        self.source_recomputes += 1;
        self.source_points.clear();
        if self.preserve_geometry {
            let reference_x = map
                .coordinate_to_static_projection(GeoCoordinate::new(0.0, self.reference_longitude))
                .x;
            self.source_points.extend(
                static_path
                    .iter()
                    .map(|p| Vec2::new(p.x - (p.x - reference_x).round(), p.y)),
            );
        } else {
            self.source_points.extend_from_slice(static_path);
        }
    }

    /// Re-derive the screen geometry from the current source points and
    /// viewport. Always recomputes; callers gate on the dirty flags as an
    /// optimization, not a correctness requirement.
    pub fn update_screen_points(&mut self, map: &GeoMap, stroke_width: f64) {
        self.screen_recomputes += 1;
        self.stroke_width = stroke_width;
        self.screen_points.clear();

        let Some(first) = self.source_points.first().copied() else {
            self.screen_bounds = Aabb2::empty();
            self.first_screen_point = Vec2::new(0.0, 0.0);
            return;
        };

        let viewport = map.viewport();
        if self.preserve_geometry {
            // One shared wrap offset keeps a preserved path continuous; per
            // point wrapping would split it at the antimeridian.
            let offset = (first.x - viewport.center_mercator().x).round();
            self.screen_points.extend(
                self.source_points
                    .iter()
                    .map(|p| viewport.mercator_to_screen(Vec2::new(p.x - offset, p.y))),
            );
        } else {
            self.screen_points.extend(
                self.source_points
                    .iter()
                    .map(|p| viewport.mercator_to_screen(viewport.wrap_to_center(*p))),
            );
        }

        self.first_screen_point = self.screen_points[0];
        self.screen_bounds = Aabb2::from_points(&self.screen_points)
            .unwrap_or_else(Aabb2::empty)
            .expanded(stroke_width / 2.0);
    }

    /// Screen-space bounding box of the last derived geometry, expanded by
    /// half the stroke width on every side.
    pub fn bounding_box(&self) -> Aabb2 {
        self.screen_bounds
    }

    /// Screen position of the path's first point.
    pub fn first_point(&self) -> Vec2 {
        self.first_screen_point
    }

    pub fn source_points(&self) -> &[Vec2] {
        &self.source_points
    }

    pub fn screen_points(&self) -> &[Vec2] {
        &self.screen_points
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Hit-test against the rendered stroke: a point within half the stroke
    /// width of any segment counts as contained. Empty geometry contains
    /// nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.stroke_width / 2.0;
        match self.screen_points.as_slice() {
            [] => false,
            [single] => (point - *single).length() <= half,
            points => points
                .windows(2)
                .any(|seg| point_segment_distance(point, seg[0], seg[1]) <= half),
        }
    }

    pub fn source_recompute_count(&self) -> u64 {
        self.source_recomputes
    }

    pub fn screen_recompute_count(&self) -> u64 {
        self.screen_recomputes
    }
}

fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::{PolylineGeometry, point_segment_distance};
    use foundation::math::{GeoCoordinate, Vec2};
    use map::{CameraCapabilities, CameraData, GeoMap, MapType, TILE_SIZE_PX};

    fn test_map(center: GeoCoordinate, zoom: f64) -> GeoMap {
        let mut map = GeoMap::new(CameraCapabilities::default(), MapType::default());
        map.resize(512.0, 512.0);
        map.set_camera_data(CameraData::new(center, zoom));
        map
    }

    fn static_path(map: &GeoMap, coords: &[GeoCoordinate]) -> Vec<Vec2> {
        coords
            .iter()
            .map(|c| map.coordinate_to_static_projection(*c))
            .collect()
    }

    #[test]
    fn source_update_is_gated_and_counted() {
        let map = test_map(GeoCoordinate::new(0.0, 0.0), 4.0);
        let path = static_path(&map, &[GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(1.0, 1.0)]);

        let mut geometry = PolylineGeometry::new();
        geometry.update_source_points(&map, &path);
        assert_eq!(geometry.source_recompute_count(), 0);
        assert!(geometry.source_points().is_empty());

        // Many mutations before a render pass coalesce into one recompute.
        geometry.mark_source_dirty();
        geometry.mark_source_dirty();
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        assert_eq!(geometry.source_recompute_count(), 1);
        assert_eq!(geometry.source_points().len(), path.len());

        geometry.mark_clean();
        geometry.update_source_points(&map, &path);
        assert_eq!(geometry.source_recompute_count(), 1);
    }

    #[test]
    fn source_update_is_idempotent() {
        let map = test_map(GeoCoordinate::new(0.0, 0.0), 4.0);
        let path = static_path(
            &map,
            &[
                GeoCoordinate::new(0.0, 0.0),
                GeoCoordinate::new(0.0, 10.0),
                GeoCoordinate::new(10.0, 10.0),
            ],
        );

        let mut geometry = PolylineGeometry::new();
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        let first = geometry.source_points().to_vec();
        geometry.update_source_points(&map, &path);
        assert_eq!(geometry.source_points(), first.as_slice());
    }

    #[test]
    fn mark_source_dirty_stales_screen_too() {
        let mut geometry = PolylineGeometry::new();
        geometry.mark_source_dirty();
        assert!(geometry.is_source_dirty());
        assert!(geometry.is_screen_dirty());

        geometry.mark_clean();
        assert!(!geometry.is_source_dirty());
        assert!(!geometry.is_screen_dirty());

        geometry.mark_screen_dirty();
        assert!(!geometry.is_source_dirty());
        assert!(geometry.is_screen_dirty());
    }

    #[test]
    fn empty_path_yields_empty_geometry() {
        let map = test_map(GeoCoordinate::new(0.0, 0.0), 4.0);
        let mut geometry = PolylineGeometry::new();
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &[]);
        geometry.update_screen_points(&map, 3.0);
        assert!(geometry.screen_points().is_empty());
        assert_eq!(geometry.bounding_box().width(), 0.0);
        assert!(!geometry.contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn screen_bounds_expand_by_half_stroke() {
        let map = test_map(GeoCoordinate::new(0.0, 0.0), 4.0);
        let path = static_path(&map, &[GeoCoordinate::new(0.0, -1.0), GeoCoordinate::new(0.0, 1.0)]);

        let mut geometry = PolylineGeometry::new();
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        geometry.update_screen_points(&map, 4.0);

        let bounds = geometry.bounding_box();
        // A flat west-east line has zero height before stroke expansion.
        assert!((bounds.height() - 4.0).abs() < 1e-9);
        assert_eq!(geometry.stroke_width(), 4.0);
    }

    #[test]
    fn contains_respects_stroke_width() {
        let map = test_map(GeoCoordinate::new(0.0, 0.0), 4.0);
        let path = static_path(&map, &[GeoCoordinate::new(0.0, -1.0), GeoCoordinate::new(0.0, 1.0)]);

        let mut geometry = PolylineGeometry::new();
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        geometry.update_screen_points(&map, 6.0);

        let mid = geometry.first_point() + (geometry.screen_points()[1] - geometry.first_point()) * 0.5;
        assert!(geometry.contains(mid));
        assert!(geometry.contains(mid + Vec2::new(0.0, 2.9)));
        assert!(!geometry.contains(mid + Vec2::new(0.0, 3.1)));
    }

    #[test]
    fn preserved_path_stays_continuous_across_antimeridian() {
        let map = test_map(GeoCoordinate::new(0.0, 179.0), 3.0);
        let coords = [
            GeoCoordinate::new(0.0, 178.0),
            GeoCoordinate::new(0.0, -178.0),
        ];
        let path = static_path(&map, &coords);

        let mut geometry = PolylineGeometry::new();
        geometry.set_preserve_geometry(true, 178.0);
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        geometry.update_screen_points(&map, 1.0);

        let pts = geometry.screen_points();
        let world_px = TILE_SIZE_PX * 8.0;
        // 4 degrees of longitude, not 356: the path did not split at the wrap.
        let expected = world_px * 4.0 / 360.0;
        assert!((pts[1].x - pts[0].x - expected).abs() < 1e-6);
    }

    #[test]
    fn unpreserved_path_splits_when_camera_is_far_from_the_seam() {
        // Camera at lon 0: per-point wrapping keeps both endpoints at their
        // raw positions, so the segment runs the long way around the world.
        let map = test_map(GeoCoordinate::new(0.0, 0.0), 3.0);
        let coords = [
            GeoCoordinate::new(0.0, 178.0),
            GeoCoordinate::new(0.0, -178.0),
        ];
        let path = static_path(&map, &coords);

        let mut geometry = PolylineGeometry::new();
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        geometry.update_screen_points(&map, 1.0);

        let world_px = TILE_SIZE_PX * 8.0;
        let pts = geometry.screen_points();
        assert!((pts[1].x - pts[0].x).abs() > world_px / 2.0);

        // The preserved variant keeps the same path continuous.
        geometry.set_preserve_geometry(true, 178.0);
        geometry.mark_source_dirty();
        geometry.update_source_points(&map, &path);
        geometry.update_screen_points(&map, 1.0);
        let pts = geometry.screen_points();
        assert!((pts[1].x - pts[0].x).abs() < world_px / 2.0);
    }

    #[test]
    fn segment_distance_basics() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(point_segment_distance(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_segment_distance(Vec2::new(-4.0, 0.0), a, b), 4.0);
        assert_eq!(point_segment_distance(Vec2::new(1.0, 1.0), a, a), 2.0_f64.sqrt());
    }
}
