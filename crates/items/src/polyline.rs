use foundation::math::{GeoCoordinate, GeoRectangle, Vec2};
use map::{GeoMap, ViewportChangeEvent};

use crate::geometry::PolylineGeometry;
use crate::node::{LineStyle, PaintNode, PolylineNode};

/// Tilt/roll magnitudes at or below this are treated as flat. Kept as a
/// named constant rather than a tunable; nothing varies it per provider.
pub const TILT_ROLL_EPSILON_DEG: f64 = 0.1;

/// A polyline/route rendered on the map.
///
/// Owns the geographic path, its cached static projection, and the derived
/// screen geometry. State machine per render pass: path or viewport
/// mutations raise dirty flags and schedule a polish; the polish pass gates
/// on region visibility, re-derives geometry, and requests a repaint; paint
/// node production then rewrites the host-owned primitive only when the
/// geometry or material actually changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineItem {
    path: Vec<GeoCoordinate>,
    static_path: Vec<Vec2>,
    bounds: Option<GeoRectangle>,
    geometry: PolylineGeometry,
    style: LineStyle,
    dirty_material: bool,
    visible_on_map: bool,
    polish_pending: bool,
    attached: bool,
    origin: Vec2,
    size: Vec2,
    anchor_offset: Vec2,
}

impl Default for PolylineItem {
    fn default() -> Self {
        Self::new(LineStyle::default())
    }
}

impl PolylineItem {
    pub fn new(style: LineStyle) -> Self {
        Self {
            path: Vec::new(),
            static_path: Vec::new(),
            bounds: None,
            geometry: PolylineGeometry::new(),
            style,
            dirty_material: false,
            visible_on_map: false,
            polish_pending: false,
            attached: false,
            origin: Vec2::new(0.0, 0.0),
            size: Vec2::new(0.0, 0.0),
            anchor_offset: Vec2::new(0.0, 0.0),
        }
    }

    /// Replace the geographic path.
    ///
    /// Invalid coordinates are filtered out here, at the boundary; nothing
    /// downstream re-validates. The static projection is derived immediately
    /// and cached until the path changes again.
    pub fn set_path(&mut self, coords: &[GeoCoordinate], map: &GeoMap) {
        self.path.clear();
        self.static_path.clear();
        for c in coords {
            if !c.is_valid() {
                continue;
            }
            self.path.push(*c);
            self.static_path.push(map.coordinate_to_static_projection(*c));
        }
        self.bounds = GeoRectangle::bounding(&self.path);
        self.attached = true;
        self.geometry.mark_source_dirty();
        self.polish_pending = true;
    }

    /// Attach to a map facade, reprojecting any stored path.
    pub fn attach(&mut self, map: &GeoMap) {
        self.static_path = self
            .path
            .iter()
            .map(|c| map.coordinate_to_static_projection(*c))
            .collect();
        self.attached = true;
        self.geometry.mark_source_dirty();
        self.polish_pending = true;
    }

    pub fn set_style(&mut self, style: LineStyle) {
        if style == self.style {
            return;
        }
        self.style = style;
        self.dirty_material = true;
        // Width changes move the stroke-expanded bounds, so regenerate.
        self.geometry.mark_source_dirty();
        self.polish_pending = true;
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub fn path(&self) -> &[GeoCoordinate] {
        &self.path
    }

    pub fn static_path(&self) -> &[Vec2] {
        &self.static_path
    }

    pub fn visible_on_map(&self) -> bool {
        self.visible_on_map
    }

    pub fn needs_polish(&self) -> bool {
        self.polish_pending
    }

    /// Screen position of the bounding box's top-left corner.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width/height of the stroke-expanded bounding box.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Offset of the path's first point from the bounding box top-left.
    pub fn anchor_offset(&self) -> Vec2 {
        self.anchor_offset
    }

    pub fn geometry(&self) -> &PolylineGeometry {
        &self.geometry
    }

    /// Reference longitude for antimeridian wrapping: the leftmost
    /// (minimum) longitude of the path. Stable frame to frame, but an
    /// approximation: a path spanning more than 180 degrees of longitude
    /// can still pick a seam.
    pub fn geo_left_bound(&self) -> f64 {
        self.path
            .iter()
            .map(|c| c.longitude)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Viewport change fan-in. Classifies the event into the tiered dirtying
    /// policy:
    /// - tilt/roll beyond [`TILT_ROLL_EPSILON_DEG`] on a map that supports
    ///   them: regenerate source geometry on every event (these transforms
    ///   are not a fixed correction of cached screen points);
    /// - bearing/size/zoom changes: one source regeneration suffices;
    /// - anything else: screen re-derivation only.
    pub fn after_viewport_changed(&mut self, map: &GeoMap, event: &ViewportChangeEvent) {
        let caps = map.camera_capabilities();

        if caps.supports_tilting && event.camera.tilt_deg.abs() > TILT_ROLL_EPSILON_DEG {
            self.geometry.mark_source_dirty();
        }

        if caps.supports_rolling && event.camera.roll_deg.abs() > TILT_ROLL_EPSILON_DEG {
            self.geometry.mark_source_dirty();
        }

        if event.bearing_changed || event.map_size_changed || event.zoom_level_changed {
            self.geometry.mark_source_dirty();
        }

        self.geometry.set_preserve_geometry(true, self.geo_left_bound());
        self.geometry.mark_screen_dirty();
        self.polish_pending = true;
    }

    /// Render-pass entry point. Returns whether a repaint is needed.
    ///
    /// Skips detached/empty items (non-visible, no geometry produced) and
    /// items whose path bounds miss the visible region (cached state is
    /// retained for when they re-enter view).
    pub fn update_polish(&mut self, map: &GeoMap) -> bool {
        self.polish_pending = false;

        if !self.attached || self.path.is_empty() {
            self.visible_on_map = false;
            return false;
        }
        let Some(bounds) = self.bounds else {
            self.visible_on_map = false;
            return false;
        };

        self.visible_on_map = map.visible_region().intersects(&bounds);
        if !self.visible_on_map {
            return false;
        }

        self.geometry.update_source_points(map, &self.static_path);
        self.geometry.update_screen_points(map, self.style.width);

        let bbox = self.geometry.bounding_box();
        self.size = Vec2::new(bbox.width(), bbox.height());
        self.origin = bbox.top_left();
        self.anchor_offset = self.geometry.first_point() - bbox.top_left();

        true
    }

    /// Paint-node production, called once per frame by the rendering
    /// collaborator with the node it owns. Returns `None` to destroy the
    /// node when the item is not visible; otherwise the node data is
    /// rewritten only when the geometry is screen-dirty or the material
    /// changed.
    pub fn update_paint_node(&mut self, old: Option<PaintNode>) -> Option<PaintNode> {
        if !self.visible_on_map {
            return None;
        }

        let (mut node, had_node) = match old {
            Some(PaintNode::Polyline(node)) => (node, true),
            None => (PolylineNode::default(), false),
        };

        if self.geometry.is_screen_dirty() || self.dirty_material || !had_node {
            self.geometry.set_preserve_geometry(false, 0.0);
            node.update(&self.style, &self.geometry);
            self.geometry.mark_clean();
            self.dirty_material = false;
        }

        Some(PaintNode::Polyline(node))
    }

    /// Hit-test against the rendered stroke.
    pub fn contains(&self, point: Vec2) -> bool {
        self.geometry.contains(point)
    }
}
