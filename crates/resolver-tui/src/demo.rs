//! Interactive demo.
//!
//! Each reload hands the resolver a fresh fake computation that settles after
//! the configured latency. Reloading while one is in flight supersedes it, so
//! the debounce and stale-result handling can be watched live.
//!
//! Keys: `r` reload, `f` reload with a failing computation, `+`/`-` adjust the
//! delay for the next reload, `q`/`Esc` quit.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use resolver_core::{Deferred, Props, Resolver, ResolverConfig};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::terminal;
use crate::view::ResolverView;

/// Target frame duration while something is loading (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Poll duration when nothing is pending.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Step applied by `+`/`-`.
const DELAY_STEP_MS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoOptions {
    pub delay: Option<i64>,
    pub latency: Duration,
}

impl From<&ResolverConfig> for DemoOptions {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            delay: config.delay(),
            latency: config.demo.latency(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoEvent {
    Key(KeyCode),
    Tick,
}

pub struct DemoApp {
    pub resolver: Resolver<String, String>,
    pub options: DemoOptions,
    pub reloads: u32,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

/// A fake computation that settles after `latency`.
pub fn fake_computation(n: u32, latency: Duration, fail: bool) -> Deferred<String, String> {
    Deferred::new(async move {
        sleep(latency).await;
        if fail {
            Err(format!("request #{n} failed"))
        } else {
            Ok(format!("result #{n} after {} ms", latency.as_millis()))
        }
    })
}

impl DemoApp {
    /// Creates the app and mounts its resolver on the first computation.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(options: DemoOptions) -> Self {
        let first = fake_computation(1, options.latency, false);
        let mut resolver = Resolver::new(Props::new(first).with_delay(options.delay));
        resolver.mount();
        Self {
            resolver,
            options,
            reloads: 1,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn reload(&mut self, fail: bool) {
        self.reloads += 1;
        debug!(reload = self.reloads, fail, "supplying new computation");
        let next = fake_computation(self.reloads, self.options.latency, fail);
        self.resolver
            .set_props(Props::new(next).with_delay(self.options.delay));
    }

    fn adjust_delay(&mut self, step: i64) {
        let current = self.options.delay.unwrap_or(0);
        self.options.delay = Some(current + step);
    }

    /// Applies one event. Returns whether a redraw is needed.
    pub fn update(&mut self, event: DemoEvent) -> bool {
        match event {
            DemoEvent::Tick => {
                let changed = self.resolver.pump();
                if self.resolver.state().is_loading {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                    return true;
                }
                changed
            }
            DemoEvent::Key(code) => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                    KeyCode::Char('r') => self.reload(false),
                    KeyCode::Char('f') => self.reload(true),
                    KeyCode::Char('+') => self.adjust_delay(DELAY_STEP_MS),
                    KeyCode::Char('-') => self.adjust_delay(-DELAY_STEP_MS),
                    _ => return false,
                }
                true
            }
        }
    }

    fn status_line(&self) -> String {
        let delay = match self.options.delay {
            Some(ms) => format!("{ms} ms"),
            None => "none".to_string(),
        };
        let phase = if self.resolver.is_pending() {
            "pending"
        } else {
            "settled"
        };
        format!(
            "delay: {delay} | latency: {} ms | request #{} {phase} | revision {}",
            self.options.latency.as_millis(),
            self.reloads,
            self.resolver.revision()
        )
    }
}

/// Draws the whole demo.
pub fn render(app: &DemoApp, frame: &mut Frame) {
    let [view_area, status_area, help_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let waiting = format!("Waiting for request #{}…", app.reloads);
    frame.render_widget(
        ResolverView::new(app.resolver.state())
            .spinner_frame(app.spinner_frame)
            .loading_label(&waiting)
            .block(Block::bordered().title(" resolver ")),
        view_area,
    );
    frame.render_widget(
        Paragraph::new(Line::raw(app.status_line())).style(Style::default().fg(Color::Cyan)),
        status_area,
    );
    frame.render_widget(
        Paragraph::new(Line::raw(
            "r reload  f reload (fail)  + / - delay  q quit",
        ))
        .style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

/// Runs the demo until the user quits. Must be called within a tokio runtime.
///
/// # Errors
/// Returns an error if the terminal cannot be set up, drawn, polled or
/// restored.
pub fn run(options: DemoOptions) -> Result<()> {
    terminal::install_panic_hook();
    let mut terminal = terminal::setup_terminal()?;
    info!(?options, "demo started");

    let result = event_loop(&mut terminal, DemoApp::new(options));

    let restored = terminal::restore_terminal();
    result.and(restored)
}

fn event_loop(terminal: &mut terminal::DemoTerminal, mut app: DemoApp) -> Result<()> {
    let mut dirty = true;
    let mut last_tick = Instant::now();

    while !app.should_quit {
        if dirty {
            terminal.draw(|frame| render(&app, frame))?;
            dirty = false;
        }

        let tick_interval = if app.resolver.is_pending() || app.resolver.state().is_loading {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };
        let timeout = tick_interval.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)?
            && let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
        {
            dirty |= app.update(DemoEvent::Key(code));
        }

        if last_tick.elapsed() >= tick_interval {
            dirty |= app.update(DemoEvent::Tick);
            last_tick = Instant::now();
        }
    }

    app.resolver.unmount();
    info!(reloads = app.reloads, "demo finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Cell;
    use resolver_core::RenderState;

    use super::*;

    fn options(delay: Option<i64>, latency_ms: u64) -> DemoOptions {
        DemoOptions {
            delay,
            latency: Duration::from_millis(latency_ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_computation_settles() {
        let mut app = DemoApp::new(options(Some(200), 100));

        app.resolver.run_until_settled().await;

        assert_eq!(
            app.resolver.state(),
            &RenderState::settled("result #1 after 100 ms".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_supersedes_in_flight_computation() {
        let mut app = DemoApp::new(options(Some(200), 100));
        assert!(app.update(DemoEvent::Key(KeyCode::Char('r'))));
        assert!(app.update(DemoEvent::Key(KeyCode::Char('f'))));

        app.resolver.run_until_settled().await;

        assert_eq!(app.reloads, 3);
        assert_eq!(app.resolver.state().value, None);
        assert_eq!(
            app.resolver.state().error.as_deref(),
            Some("request #3 failed")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_computation_animates_spinner() {
        let mut app = DemoApp::new(options(Some(50), 1000));

        assert!(app.resolver.next_event().await);
        assert!(app.update(DemoEvent::Tick));
        assert!(app.update(DemoEvent::Tick));

        assert!(app.resolver.state().is_loading);
        assert_eq!(app.spinner_frame, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_keys_apply_to_next_reload() {
        let mut app = DemoApp::new(options(None, 100));
        app.update(DemoEvent::Key(KeyCode::Char('+')));
        app.update(DemoEvent::Key(KeyCode::Char('+')));
        app.update(DemoEvent::Key(KeyCode::Char('-')));
        assert_eq!(app.options.delay, Some(100));

        assert!(!app.update(DemoEvent::Key(KeyCode::Char('x'))));
        app.update(DemoEvent::Key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_shows_status_and_view() {
        let app = DemoApp::new(options(Some(0), 100));
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();

        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(Cell::symbol)
            .collect();
        assert!(text.contains("Waiting for request #1…"));
        assert!(text.contains("delay: 0 ms"));
        assert!(text.contains("request #1 pending"));
    }
}
