//! Resolves a deferred value into something renderable.
//!
//! A [`Resolver`] takes a plain value or a [`Deferred`] handle on every render
//! pass and exposes a [`RenderState`]: the settled value, the error, and a
//! debounced `is_loading` flag that only turns on if the handle is still
//! pending after the configured delay.
//!
//! Module layout follows the Elm split:
//!
//! - `state`: render state, props, internal state
//! - `update`: pure reducer (`derive`, `start_lifecycle`, `update`)
//! - `effects` / `events`: what the reducer asks for, what callbacks report
//! - `runtime`: the instance that executes effects and drains its inbox

pub mod config;
pub mod deferred;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod task;
pub mod update;

pub use config::ResolverConfig;
pub use deferred::{Deferred, DeferredId, Input, Settler};
pub use render::{Children, ValueOnly};
pub use runtime::Resolver;
pub use state::{DEFAULT_DELAY_MS, Props, RenderState};
