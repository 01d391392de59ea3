//! Create Meeting Modal

use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::models::{MeetingType, NewMeeting};
use crate::validation::{validate_meeting, FieldErrors, MeetingForm};

#[component]
pub fn CreateMeetingModal(
    #[prop(into)] on_submit: Callback<NewMeeting>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let initial = MeetingForm { meeting_type: MeetingType::Special.as_str().to_string(), ..Default::default() };
    let (form, set_form) = signal(initial);
    let (errors, set_errors) = signal(FieldErrors::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match form.with(validate_meeting) {
            Ok(meeting) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(meeting);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    view! {
        <Modal title="New meeting" on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <div class="form-row">
                    <label>
                        "Date"
                        <input
                            type="date"
                            prop:value=move || form.with(|f| f.date.clone())
                            on:input=move |ev| set_form.update(|f| f.date = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="date" />
                    </label>
                    <label>
                        "Type"
                        <select
                            prop:value=move || form.with(|f| f.meeting_type.clone())
                            on:change=move |ev| set_form.update(|f| f.meeting_type = event_target_value(&ev))
                        >
                            {MeetingType::ALL.into_iter().map(|t| view! {
                                <option value=t.as_str()>{t.label()}</option>
                            }).collect_view()}
                        </select>
                        <FieldError errors=errors field="meeting_type" />
                    </label>
                </div>

                <div class="form-row">
                    <label>
                        "Start"
                        <input
                            type="time"
                            prop:value=move || form.with(|f| f.start_time.clone())
                            on:input=move |ev| set_form.update(|f| f.start_time = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="start_time" />
                    </label>
                    <label>
                        "End"
                        <input
                            type="time"
                            prop:value=move || form.with(|f| f.end_time.clone())
                            on:input=move |ev| set_form.update(|f| f.end_time = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="end_time" />
                    </label>
                </div>

                <label>
                    "Title"
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.title.clone())
                        on:input=move |ev| set_form.update(|f| f.title = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Location"
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.location.clone())
                        on:input=move |ev| set_form.update(|f| f.location = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Description (Markdown)"
                    <textarea
                        rows="4"
                        prop:value=move || form.with(|f| f.description.clone())
                        on:input=move |ev| set_form.update(|f| f.description = event_target_value(&ev))
                    ></textarea>
                </label>

                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error label="Create" />
            </form>
        </Modal>
    }
}
