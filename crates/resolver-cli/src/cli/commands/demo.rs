//! Demo command handler.

use anyhow::Result;
use resolver_tui::{DemoOptions, demo};
use tokio::task;

/// Runs the interactive demo on the current runtime thread.
///
/// The terminal loop blocks on input polling, so it is moved off the async
/// scheduler with `block_in_place`.
pub fn run(options: DemoOptions) -> Result<()> {
    task::block_in_place(|| demo::run(options))
}
