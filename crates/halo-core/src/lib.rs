pub mod animation;
pub mod arrangement;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod render_loop;
pub mod scene;
pub mod stage;
#[cfg(not(target_arch = "wasm32"))]
pub mod ticker;
pub mod viewport;

pub static INSTANCES_WGSL: &str = include_str!("../shaders/instances.wgsl");
pub static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");

pub use animation::*;
pub use arrangement::{generate, ArrangementSpec, Pattern};
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use render_loop::*;
pub use scene::*;
pub use stage::*;
#[cfg(not(target_arch = "wasm32"))]
pub use ticker::*;
pub use viewport::*;
