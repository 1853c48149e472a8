//! Trace command handler.
//!
//! Drives a resolver without a terminal UI and prints one line per observed
//! render-state change:
//!
//! ```text
//!     0ms  value=- error=- loading=false
//!   200ms  value=- error=- loading=true
//!   800ms  value=result #1 after 800 ms error=- loading=false
//! ```

use std::io::{self, Write};
use std::pin::pin;
use std::time::Duration;

use anyhow::Result;
use resolver_core::{Children, Props, RenderState, Resolver};
use resolver_tui::DemoOptions;
use resolver_tui::demo::fake_computation;
use tokio::time::{Instant, sleep};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub timing: DemoOptions,
    pub fail: bool,
    pub supersede_after: Option<Duration>,
}

enum Step {
    Supersede,
    Event(bool),
}

/// Formats the render state as one trace line.
pub fn describe(state: &RenderState<String, String>) -> String {
    format!(
        "value={} error={} loading={}",
        state.value.as_deref().unwrap_or("-"),
        state.error.as_deref().unwrap_or("-"),
        state.is_loading
    )
}

pub async fn run(options: TraceOptions) -> Result<()> {
    let mut stdout = io::stdout();
    run_with(&options, &mut stdout).await
}

/// Writes the current line and returns the revision it reflects.
fn emit<W, C>(resolver: &Resolver<String, String, C>, start: Instant, out: &mut W) -> Result<u64>
where
    W: Write,
    C: Children<String, String, Output = String>,
{
    writeln!(out, "{:>5}ms  {}", start.elapsed().as_millis(), resolver.render())?;
    Ok(resolver.revision())
}

pub async fn run_with<W: Write>(options: &TraceOptions, out: &mut W) -> Result<()> {
    let start = Instant::now();
    let timing = &options.timing;

    let first = fake_computation(1, timing.latency, options.fail);
    let mut resolver = Resolver::with_children(Props::new(first).with_delay(timing.delay), describe);
    resolver.mount();
    let mut last_revision = emit(&resolver, start, out)?;

    let mut supersede = options.supersede_after.map(|after| Box::pin(sleep(after)));
    loop {
        let step = match supersede.as_mut() {
            None => Step::Event(resolver.next_event().await),
            Some(timer) if !resolver.is_pending() => {
                timer.await;
                Step::Supersede
            }
            Some(timer) => {
                let next = pin!(resolver.next_event());
                tokio::select! {
                    () = timer => Step::Supersede,
                    more = next => Step::Event(more),
                }
            }
        };

        match step {
            Step::Supersede => {
                supersede = None;
                debug!("supplying second computation");
                let second = fake_computation(2, timing.latency, options.fail);
                resolver.set_props(Props::new(second).with_delay(timing.delay));
            }
            Step::Event(false) => break,
            Step::Event(true) => {}
        }

        if resolver.revision() != last_revision {
            last_revision = emit(&resolver, start, out)?;
        }
    }

    resolver.unmount();
    Ok(())
}
