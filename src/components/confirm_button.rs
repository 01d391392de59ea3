//! Two-step action button for row actions that cannot be undone.
//!
//! The first press arms the button and shows a prompt with Yes/No. An armed
//! button falls back to idle on its own after a few seconds.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const DISARM_AFTER_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    Idle,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Action,
    Yes,
    No,
    Expired,
}

impl Confirm {
    /// Next state, and whether the action fires
    fn press(self, press: Press) -> (Self, bool) {
        match (self, press) {
            (Self::Idle, Press::Action) => (Self::Armed, false),
            (Self::Armed, Press::Yes) => (Self::Idle, true),
            _ => (Self::Idle, false),
        }
    }
}

#[component]
pub fn ConfirmButton(
    #[prop(into)] label: String,
    /// Question shown while armed
    #[prop(optional, into)]
    prompt: Option<String>,
    /// Render the idle button in the danger style
    #[prop(optional)]
    danger: bool,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let state = RwSignal::new(Confirm::Idle);
    let disarm = StoredValue::new_local(None::<Timeout>);
    let prompt = StoredValue::new(prompt.unwrap_or_else(|| format!("{}?", label)));
    let label = StoredValue::new(label);

    let press = move |press: Press| {
        let Some(current) = state.try_get_untracked() else { return };
        let (next, fire) = current.press(press);
        state.set(next);

        // Replacing the slot drops (and so cancels) any pending timer
        let timer = (next == Confirm::Armed).then(|| {
            Timeout::new(DISARM_AFTER_MS, move || {
                if let Some(current) = state.try_get_untracked() {
                    state.try_set(current.press(Press::Expired).0);
                }
            })
        });
        disarm.try_update_value(|slot| *slot = timer);

        if fire {
            on_confirm.run(());
        }
    };

    let action_class = if danger { "btn small danger" } else { "btn small" };

    move || match state.get() {
        Confirm::Idle => view! {
            <button
                type="button"
                class=action_class
                on:click=move |ev| {
                    ev.stop_propagation();
                    press(Press::Action);
                }
            >
                {label.get_value()}
            </button>
        }
        .into_any(),
        Confirm::Armed => view! {
            <span class="confirm-inline">
                <span class="confirm-prompt">{prompt.get_value()}</span>
                <button
                    type="button"
                    class="btn small danger"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        press(Press::Yes);
                    }
                >
                    "Yes"
                </button>
                <button
                    type="button"
                    class="btn small"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        press(Press::No);
                    }
                >
                    "No"
                </button>
            </span>
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_fires_only_after_arming() {
        assert_eq!(Confirm::Idle.press(Press::Yes), (Confirm::Idle, false));
        let (armed, fired) = Confirm::Idle.press(Press::Action);
        assert_eq!((armed, fired), (Confirm::Armed, false));
        assert_eq!(armed.press(Press::Yes), (Confirm::Idle, true));
    }

    #[test]
    fn test_declined_or_expired_returns_to_idle() {
        assert_eq!(Confirm::Armed.press(Press::No), (Confirm::Idle, false));
        assert_eq!(Confirm::Armed.press(Press::Expired), (Confirm::Idle, false));
        assert_eq!(Confirm::Idle.press(Press::Expired), (Confirm::Idle, false));
    }
}
