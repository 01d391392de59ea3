//! Meeting Configuration Modal
//!
//! Loads the current schedule settings, edits them as text fields and
//! validates before handing them back.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::error_banner::ErrorBanner;
use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::context::AppContext;
use crate::models::{MeetingConfiguration, WEEKDAYS};
use crate::validation::{validate_configuration, ConfigurationForm, FieldErrors, MAX_PRESENTERS, MAX_REMINDER_DAYS};

#[component]
pub fn MeetingConfigModal(
    #[prop(into)] on_submit: Callback<MeetingConfiguration>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (form, set_form) = signal(ConfigurationForm::default());
    let (loaded, set_loaded) = signal(false);
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let (errors, set_errors) = signal(FieldErrors::new());

    let load = move || {
        let client = ctx.client();
        set_load_error.set(None);
        spawn_local(async move {
            match api::get_meeting_configuration(&client).await {
                Ok(config) => {
                    set_form.set(ConfigurationForm::from(&config));
                    set_loaded.set(true);
                }
                Err(err) => set_load_error.set(Some(ctx.handle_error("load configuration", &err))),
            }
        });
    };
    load();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match form.with(validate_configuration) {
            Ok(config) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(config);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    let count_input = move |get: fn(&ConfigurationForm) -> String, set: fn(&mut ConfigurationForm, String), max: u8| {
        view! {
            <input
                type="number"
                min="0"
                max=max.to_string()
                prop:value=move || form.with(get)
                on:input=move |ev| set_form.update(|f| set(f, event_target_value(&ev)))
            />
        }
    };

    view! {
        <Modal title="Meeting configuration" on_close=on_close>
            <ErrorBanner message=load_error on_retry=Callback::new(move |_: ()| load()) />
            <Show when=move || loaded.get() fallback=move || view! { <p class="muted">"Loading..."</p> }>
                <form class="modal-form" on:submit=submit>
                    <label>
                        "Day of week"
                        <select
                            prop:value=move || form.with(|f| f.day_of_week.clone())
                            on:change=move |ev| set_form.update(|f| f.day_of_week = event_target_value(&ev))
                        >
                            {WEEKDAYS.iter().enumerate().map(|(i, day)| view! {
                                <option value=i.to_string()>{*day}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <FieldError errors=errors field="day_of_week" />

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
                        "Location"
                        <input
                            type="text"
                            prop:value=move || form.with(|f| f.location.clone())
                            on:input=move |ev| set_form.update(|f| f.location = event_target_value(&ev))
                        />
                    </label>
                    <FieldError errors=errors field="location" />

                    <div class="form-row">
                        <label>
                            "Research update presenters"
                            {count_input(
                                |f| f.research_update_presenters.clone(),
                                |f, v| f.research_update_presenters = v,
                                MAX_PRESENTERS,
                            )}
                            <FieldError errors=errors field="research_update_presenters" />
                        </label>
                        <label>
                            "Journal club presenters"
                            {count_input(
                                |f| f.journal_club_presenters.clone(),
                                |f, v| f.journal_club_presenters = v,
                                MAX_PRESENTERS,
                            )}
                            <FieldError errors=errors field="journal_club_presenters" />
                        </label>
                    </div>

                    <label>
                        "Reminder days before"
                        {count_input(
                            |f| f.reminder_days_before.clone(),
                            |f, v| f.reminder_days_before = v,
                            MAX_REMINDER_DAYS,
                        )}
                    </label>
                    <FieldError errors=errors field="reminder_days_before" />

                    <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error />
                </form>
            </Show>
        </Modal>
    }
}
