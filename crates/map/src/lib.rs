pub mod camera;
pub mod events;
pub mod map;
pub mod map_type;
pub mod viewport;

pub use camera::*;
pub use events::*;
pub use map::*;
pub use map_type::*;
pub use viewport::*;
