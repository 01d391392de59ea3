//! Generate Meetings Modal

use chrono::Duration;
use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::filters::today;
use crate::models::GenerateMeetingsRequest;
use crate::validation::{validate_generate, FieldErrors};

/// Ask the server to fill a date range with meetings.
/// Presenter assignment happens server-side.
#[component]
pub fn GenerateModal(
    #[prop(into)] on_submit: Callback<GenerateMeetingsRequest>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let today = today();
    let (start, set_start) = signal(today.format("%Y-%m-%d").to_string());
    let (end, set_end) = signal((today + Duration::weeks(12)).format("%Y-%m-%d").to_string());
    let (errors, set_errors) = signal(FieldErrors::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match validate_generate(&start.get(), &end.get()) {
            Ok(range) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(range);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    view! {
        <Modal title="Generate meetings" on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <div class="form-row">
                    <label>
                        "From"
                        <input type="date" prop:value=move || start.get() on:input=move |ev| set_start.set(event_target_value(&ev)) />
                        <FieldError errors=errors field="start_date" />
                    </label>
                    <label>
                        "To"
                        <input type="date" prop:value=move || end.get() on:input=move |ev| set_end.set(event_target_value(&ev)) />
                        <FieldError errors=errors field="end_date" />
                    </label>
                </div>
                <p class="muted">"Existing meetings in the range are kept."</p>
                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error label="Generate" />
            </form>
        </Modal>
    }
}
