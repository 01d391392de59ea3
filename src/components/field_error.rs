//! Field Error Component

use leptos::prelude::*;

use crate::validation::FieldErrors;

/// Message shown beneath an input when its field failed validation
#[component]
pub fn FieldError(#[prop(into)] errors: Signal<FieldErrors>, field: &'static str) -> impl IntoView {
    move || errors.with(|e| e.get(field)).map(|msg| view! { <p class="field-error">{msg}</p> })
}
