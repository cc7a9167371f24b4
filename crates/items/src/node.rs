use foundation::math::Vec2;

use crate::geometry::PolylineGeometry;

/// Stroke appearance of a polyline item. Width is in pixels, independent of
/// the map zoom level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub color: [f32; 4],
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Paintable polyline primitive.
///
/// Ownership rule: the rendering collaborator owns the node across frames;
/// the core only mutates it through [`PolylineNode::update`] or signals
/// destruction by returning `None` from paint-node production. Vertex data
/// is rewritten wholesale, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineNode {
    pub vertices: Vec<Vec2>,
    pub color: [f32; 4],
    pub width: f64,
}

impl PolylineNode {
    pub fn update(&mut self, style: &LineStyle, geometry: &PolylineGeometry) {
        self.vertices.clear();
        self.vertices.extend_from_slice(geometry.screen_points());
        self.color = style.color;
        self.width = style.width;
    }
}

/// Paint primitive produced by a map item, tagged by item kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintNode {
    Polyline(PolylineNode),
}

#[cfg(test)]
mod tests {
    use super::{LineStyle, PolylineNode};
    use crate::geometry::PolylineGeometry;

    #[test]
    fn update_copies_screen_geometry_and_material() {
        let geometry = PolylineGeometry::new();
        let style = LineStyle {
            width: 3.0,
            color: [1.0, 0.0, 0.0, 1.0],
        };
        let mut node = PolylineNode::default();
        node.update(&style, &geometry);
        assert!(node.vertices.is_empty());
        assert_eq!(node.width, 3.0);
        assert_eq!(node.color, [1.0, 0.0, 0.0, 1.0]);
    }
}
