//! Rendering module
//!
//! `shapes` builds entity outlines as plain geometry; `canvas` draws them
//! (and the sprites) through the browser's Canvas 2D API.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{Shape, entity_shape};
