//! Postpone Modal

use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::models::{GroupMeeting, PostponeRequest};
use crate::validation::{validate_postpone, FieldErrors};

/// Move a meeting to a later date
#[component]
pub fn PostponeModal(
    meeting: GroupMeeting,
    #[prop(into)] on_submit: Callback<PostponeRequest>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let current = meeting.date;
    let (new_date, set_new_date) = signal(String::new());
    let (reason, set_reason) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match validate_postpone(current, &new_date.get(), &reason.get()) {
            Ok(request) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(request);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    let min_date = current.succ_opt().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();

    view! {
        <Modal title=format!("Postpone {}", meeting.display_title()) on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <p class="muted">{format!("Currently on {}", current.format("%A, %Y-%m-%d"))}</p>
                <label>
                    "New date"
                    <input
                        type="date"
                        min=min_date
                        prop:value=move || new_date.get()
                        on:input=move |ev| set_new_date.set(event_target_value(&ev))
                    />
                </label>
                <FieldError errors=errors field="new_date" />
                <label>
                    "Reason (optional)"
                    <textarea
                        rows="2"
                        prop:value=move || reason.get()
                        on:input=move |ev| set_reason.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error label="Postpone" />
            </form>
        </Modal>
    }
}
