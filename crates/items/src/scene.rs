use foundation::math::Vec2;
use map::{CameraData, GeoMap};
use runtime::{EventBus, Frame};

use crate::node::PaintNode;
use crate::polyline::PolylineItem;

/// A renderable item held by the scene, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Polyline(PolylineItem),
}

impl SceneItem {
    fn needs_polish(&self) -> bool {
        match self {
            Self::Polyline(item) => item.needs_polish(),
        }
    }

    fn after_viewport_changed(&mut self, map: &GeoMap, event: &map::ViewportChangeEvent) {
        match self {
            Self::Polyline(item) => item.after_viewport_changed(map, event),
        }
    }

    fn update_polish(&mut self, map: &GeoMap) -> bool {
        match self {
            Self::Polyline(item) => item.update_polish(map),
        }
    }

    fn update_paint_node(&mut self, old: Option<PaintNode>) -> Option<PaintNode> {
        match self {
            Self::Polyline(item) => item.update_paint_node(old),
        }
    }

    fn contains(&self, point: Vec2) -> bool {
        match self {
            Self::Polyline(item) => item.contains(point),
        }
    }
}

/// Owns the map facade and the active items, and dispatches viewport
/// changes to them.
///
/// The camera is mutated only through the scene, never by an item; every
/// change is classified once and fanned out to all items, which decide
/// their own dirtying tier. Geometry recomputation then happens in the
/// polish pass, one synchronous run per frame, traced on the event bus.
pub struct MapScene {
    map: GeoMap,
    items: Vec<SceneItem>,
}

impl MapScene {
    pub fn new(map: GeoMap) -> Self {
        Self {
            map,
            items: Vec::new(),
        }
    }

    pub fn map(&self) -> &GeoMap {
        &self.map
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Add a polyline item, attaching it to the scene's map (which projects
    /// any stored path and schedules an initial polish).
    pub fn add_polyline(&mut self, mut item: PolylineItem) -> usize {
        item.attach(&self.map);
        self.items.push(SceneItem::Polyline(item));
        self.items.len() - 1
    }

    /// Mutable access to a polyline item together with the facade, for path
    /// and style mutation.
    pub fn polyline_mut(&mut self, index: usize) -> Option<(&mut PolylineItem, &GeoMap)> {
        let map = &self.map;
        match self.items.get_mut(index) {
            Some(SceneItem::Polyline(item)) => Some((item, map)),
            None => None,
        }
    }

    /// Replace the camera and notify every item. A camera equal to the
    /// current one dispatches nothing.
    pub fn set_camera_data(&mut self, camera: CameraData) {
        let event = self.map.set_camera_data(camera);
        if !event.any_changed() {
            return;
        }
        for item in &mut self.items {
            item.after_viewport_changed(&self.map, &event);
        }
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        let event = self.map.resize(width_px, height_px);
        for item in &mut self.items {
            item.after_viewport_changed(&self.map, &event);
        }
    }

    pub fn camera_stopped(&mut self) {
        self.map.camera_stopped();
    }

    /// The per-frame render pass: runs pending polish work and traces it.
    /// Items without a pending polish are untouched, so repeated passes
    /// without mutations do no geometry work.
    pub fn polish_pass(&mut self, frame: Frame, bus: &mut EventBus) {
        for (index, item) in self.items.iter_mut().enumerate() {
            if !item.needs_polish() {
                continue;
            }
            bus.emit(frame, "polish", format!("item {index}"));
            if item.update_polish(&self.map) {
                bus.emit(frame, "repaint", format!("item {index}"));
            }
        }
    }

    /// Paint-node production for one item. The caller owns the node; `None`
    /// destroys it.
    pub fn update_paint_node(&mut self, index: usize, old: Option<PaintNode>) -> Option<PaintNode> {
        self.items.get_mut(index)?.update_paint_node(old)
    }

    pub fn contains(&self, index: usize, point: Vec2) -> bool {
        self.items.get(index).is_some_and(|item| item.contains(point))
    }
}
