//! Widget that draws a resolver's render state.
//!
//! Precedence: error, then loading, then value. While loading, a stale value
//! from the previous cycle is still shown next to the spinner.

use std::fmt::Display;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use resolver_core::RenderState;

/// Spinner frames for the loading indicator.
pub const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Label shown while loading when there is no stale value.
const DEFAULT_LOADING_LABEL: &str = "Loading…";

#[derive(Debug, Clone)]
pub struct ResolverView<'a, T, E> {
    state: &'a RenderState<T, E>,
    spinner_frame: usize,
    loading_label: &'a str,
    block: Option<Block<'a>>,
}

impl<'a, T, E> ResolverView<'a, T, E>
where
    T: Display,
    E: Display,
{
    pub fn new(state: &'a RenderState<T, E>) -> Self {
        Self {
            state,
            spinner_frame: 0,
            loading_label: DEFAULT_LOADING_LABEL,
            block: None,
        }
    }

    #[must_use]
    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    #[must_use]
    pub fn loading_label(mut self, label: &'a str) -> Self {
        self.loading_label = label;
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn line(&self) -> Option<Line<'static>> {
        let state = self.state;
        if let Some(error) = &state.error {
            return Some(Line::from(vec![
                Span::styled(
                    "error: ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(error.to_string(), Style::default().fg(Color::Red)),
            ]));
        }

        if state.is_loading {
            let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            let rest = match &state.value {
                Some(value) => Span::styled(
                    value.to_string(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                None => Span::styled(
                    self.loading_label.to_string(),
                    Style::default().fg(Color::Yellow),
                ),
            };
            return Some(Line::from(vec![
                Span::styled(frame, Style::default().fg(Color::Yellow)),
                Span::raw(" "),
                rest,
            ]));
        }

        state.value.as_ref().map(|value| Line::raw(value.to_string()))
    }
}

impl<T, E> Widget for ResolverView<'_, T, E>
where
    T: Display,
    E: Display,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let Some(line) = self.line() else {
            return;
        };
        Paragraph::new(line)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::buffer::Cell;

    use super::*;

    fn draw(state: &RenderState<String, String>, frame: usize) -> String {
        let area = Rect::new(0, 0, 24, 1);
        let mut buf = Buffer::empty(area);
        ResolverView::new(state).spinner_frame(frame).render(area, &mut buf);
        buf.content()
            .iter()
            .map(Cell::symbol)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_empty_state_draws_nothing() {
        assert_eq!(draw(&RenderState::default(), 0), "");
    }

    #[test]
    fn test_value_is_drawn_as_is() {
        assert_eq!(draw(&RenderState::settled("foo".to_string()), 0), "foo");
    }

    #[test]
    fn test_error_takes_precedence() {
        let state = RenderState {
            value: None,
            error: Some("boom".to_string()),
            is_loading: true,
        };
        assert_eq!(draw(&state, 0), "error: boom");
    }

    #[test]
    fn test_loading_shows_spinner_and_label() {
        let state = RenderState {
            value: None,
            error: None,
            is_loading: true,
        };
        assert_eq!(draw(&state, 0), "◐ Loading…");
        assert_eq!(draw(&state, 5), "◓ Loading…");
    }

    #[test]
    fn test_custom_loading_label() {
        let area = Rect::new(0, 0, 24, 1);
        let mut buf = Buffer::empty(area);
        let state: RenderState<String, String> = RenderState {
            value: None,
            error: None,
            is_loading: true,
        };
        ResolverView::new(&state)
            .loading_label("fetching")
            .render(area, &mut buf);

        let text: String = buf.content().iter().map(Cell::symbol).collect();
        assert_eq!(text.trim_end(), "◐ fetching");
    }

    #[test]
    fn test_loading_keeps_stale_value_visible() {
        let state = RenderState {
            value: Some("old".to_string()),
            error: None,
            is_loading: true,
        };
        assert_eq!(draw(&state, 2), "◑ old");
    }

    #[test]
    fn test_block_is_rendered_around_content() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let state: RenderState<String, String> = RenderState::settled("ok".to_string());
        ResolverView::new(&state)
            .block(Block::bordered())
            .render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "o");
        assert_eq!(buf[(2, 1)].symbol(), "k");
        assert_eq!(buf[(0, 0)].symbol(), "┌");
    }
}
