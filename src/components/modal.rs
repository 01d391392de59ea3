//! Modal Component
//!
//! Backdrop plus dialog frame. Clicking the backdrop or the close button
//! runs `on_close`; clicks inside the dialog do not reach the backdrop.

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] wide: bool,
    children: Children,
) -> impl IntoView {
    let dialog_class = if wide { "modal modal-wide" } else { "modal" };

    view! {
        <div class="modal-backdrop" on:click=move |_| on_close.run(())>
            <div
                class=dialog_class
                role="dialog"
                on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
            >
                <div class="modal-header">
                    <h2>{title}</h2>
                    <button type="button" class="modal-close" title="Close" on:click=move |_| on_close.run(())>
                        "✕"
                    </button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}
