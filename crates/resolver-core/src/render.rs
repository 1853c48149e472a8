//! Render contract.
//!
//! A resolver either hands its raw value to the host (`ValueOnly`) or calls a
//! caller-supplied function with the full `RenderState`. Any
//! `Fn(&RenderState<T, E>) -> O` is a valid set of children.

use crate::state::RenderState;

pub trait Children<T, E> {
    type Output;

    fn render(&self, state: &RenderState<T, E>) -> Self::Output;
}

/// No rendering function: output is the current value, ignoring error and
/// loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueOnly;

impl<T, E> Children<T, E> for ValueOnly
where
    T: Clone,
{
    type Output = Option<T>;

    fn render(&self, state: &RenderState<T, E>) -> Option<T> {
        state.value.clone()
    }
}

impl<T, E, O, F> Children<T, E> for F
where
    F: Fn(&RenderState<T, E>) -> O,
{
    type Output = O;

    fn render(&self, state: &RenderState<T, E>) -> O {
        self(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_only_ignores_error_and_loading() {
        let state = RenderState {
            value: Some("stale"),
            error: Some("boom"),
            is_loading: true,
        };
        assert_eq!(ValueOnly.render(&state), Some("stale"));
        assert_eq!(
            Children::<&str, &str>::render(&ValueOnly, &RenderState::default()),
            None
        );
    }

    #[test]
    fn test_closure_receives_full_state() {
        let children = |state: &RenderState<String, String>| -> String {
            if let Some(error) = &state.error {
                return error.clone();
            }
            if state.is_loading {
                return "Is loading …".to_string();
            }
            state.value.clone().unwrap_or_default()
        };

        assert_eq!(children.render(&RenderState::failed("err".to_string())), "err");
        assert_eq!(children.render(&RenderState::settled("ok".to_string())), "ok");
        let loading = RenderState {
            value: Some("ok".to_string()),
            error: None,
            is_loading: true,
        };
        assert_eq!(children.render(&loading), "Is loading …");
        assert_eq!(children.render(&RenderState::default()), "");
    }
}
