//! User interface rendering layer with component-based architecture.
//!
//! This module turns the presentation state into ANSI-styled terminal text.
//!
//! # Architecture
//!
//! ```text
//! Session → compute_viewmodel → UIViewModel → render_screen → ANSI text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator and notification lines
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (centering, bars)
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_notification, render_to_string};
pub use theme::Theme;
pub use viewmodel::{
    EmptyState, FailureView, FeatureView, FooterInfo, HeaderInfo, LoadingInfo, PanelView,
    ResultView, UIViewModel, UploadInfo,
};
