mod color;
mod config;
mod error;
mod particle;
mod render;
mod scene;
mod scenery;
mod surface;

pub use color::*;
pub use config::*;
pub use error::*;
pub use particle::*;
pub use render::*;
pub use scene::*;
pub use scenery::*;
pub use surface::*;
