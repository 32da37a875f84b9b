//! Rendering
//!
//! `scene` turns a session into a backend-neutral draw list; `shapes`
//! tessellates it and `pipeline` draws the triangles with WebGPU. Text
//! commands are left to the page's HUD layer.

pub mod draw;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use draw::{DrawCmd, Rgba, TextAlign};
pub use pipeline::RenderState;
pub use scene::build_frame;
pub use shapes::tessellate;
pub use vertex::Vertex;
