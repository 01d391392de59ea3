//! Form Actions Component
//!
//! Submit error plus Cancel/Save row shared by the modal forms.

use leptos::prelude::*;

#[component]
pub fn FormActions(
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(into)] submitting: Signal<bool>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(optional, into)] label: Option<String>,
) -> impl IntoView {
    let label = label.unwrap_or_else(|| "Save".to_string());

    view! {
        {move || submit_error.get().map(|msg| view! { <div class="error-banner" role="alert">{msg}</div> })}
        <div class="form-actions">
            <button type="button" class="btn" on:click=move |_| on_cancel.run(())>"Cancel"</button>
            <button type="submit" class="btn primary" disabled=move || submitting.get()>
                {move || if submitting.get() { "Saving...".to_string() } else { label.clone() }}
            </button>
        </div>
    }
}
