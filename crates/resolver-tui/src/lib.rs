//! Terminal front end for `resolver-core`.
//!
//! - `view`: ratatui widget for a `RenderState`
//! - `demo`: interactive alternate-screen demo
//! - `terminal`: setup/restore and panic hook

pub mod demo;
pub mod terminal;
pub mod view;

pub use demo::{DemoApp, DemoOptions};
pub use view::ResolverView;
