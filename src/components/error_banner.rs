//! Error Banner Component

use leptos::prelude::*;

/// Inline error with optional retry/dismiss actions; hidden when `message` is None
#[component]
pub fn ErrorBanner(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(optional)] on_retry: Option<Callback<()>>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div class="error-banner" role="alert">
                    <span class="error-text">{msg}</span>
                    {on_retry.map(|retry| view! {
                        <button type="button" class="btn small" on:click=move |_| retry.run(())>"Retry"</button>
                    })}
                    {on_dismiss.map(|dismiss| view! {
                        <button type="button" class="btn small ghost" on:click=move |_| dismiss.run(())>"✕"</button>
                    })}
                </div>
            }
        })
    }
}
