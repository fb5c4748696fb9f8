//! Rendering module
//!
//! `frame::render` composes a drum frame onto any `Surface`. `MeshSurface`
//! tessellates it for the WebGPU pipeline; `CommandList` records it.

pub mod frame;
pub mod mesh;
pub mod palette;
pub mod pipeline;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use frame::{ExitTube, render};
pub use mesh::MeshSurface;
pub use palette::{Color, Palette};
pub use pipeline::RenderState;
pub use surface::{CommandList, DrawCommand, Fill, Label, Surface};
pub use vertex::Vertex;
