//! Procedural tree images.
//!
//! [`tree::render_tree`] grows a randomized recursive tree onto any
//! [`canvas::Surface`]; [`tree::render`] does a whole picture on a
//! [`canvas::Canvas`]. The `treegen` binary wraps this as a CLI and a small
//! HTTP form ([`server`]).

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod html;
pub mod server;
pub mod settings;
pub mod tree;
pub mod viewer;

pub use canvas::{Canvas, Point, Segment, Surface};
pub use config::{BranchGuard, Gaussian, Limits, TreeConfig, TreeParams};
pub use error::{ConfigError, RenderError, SettingsError};
pub use tree::{grow_tree, render, render_tree, Branch, Sprout};
