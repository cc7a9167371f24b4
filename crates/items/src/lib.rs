pub mod geometry;
pub mod node;
pub mod polyline;
pub mod scene;

pub use geometry::*;
pub use node::*;
pub use polyline::*;
pub use scene::*;
