pub mod coords;
pub mod document;
pub mod error;
pub mod hit;
pub mod id;
pub mod model;

pub use coords::{ImagePoint, ImageSize, ScreenRect, SurfaceMapping, screen_to_image};
pub use document::{DanglingEdgePolicy, deserialize, deserialize_with, serialize};
pub use error::{Error, Result};
pub use hit::hit_test;
pub use id::{IdAllocator, NodeId};
pub use model::*;
