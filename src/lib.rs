//! mechtree: client for the evolution tree of game mechanics.
//!
//! Layers, innermost first:
//! - `domain`: entities, forms, the backend contract and tree layout
//! - `application`: client state, its reducer and the store service
//! - `infrastructure`: HTTP backend, session file, dependency wiring
//! - `render`: canvas, SVG, flow-graph, graph-element and terminal renderers
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod render;
pub mod util;
