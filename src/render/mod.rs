//! Renderers: pure projections of trees and catalogs into drawable output.
//!
//! Nothing here mutates its input or performs I/O.

pub mod canvas;
pub mod flow;
pub mod graph;
pub mod svg;
pub mod text;

pub use canvas::{render, CanvasStyle, CanvasSurface, DrawCommand};
pub use flow::FlowGraph;
pub use graph::{GraphElements, LayoutHint};
pub use svg::to_svg;
pub use text::to_tree_string;
