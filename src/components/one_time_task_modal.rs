//! One-Time Task Modal

use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::context::AppContext;
use crate::models::NewOneTimeTask;
use crate::store::active_presenters;
use crate::validation::{validate_one_time_task, FieldErrors};

#[component]
pub fn OneTimeTaskModal(
    #[prop(into)] on_submit: Callback<NewOneTimeTask>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (due_date, set_due_date) = signal(String::new());
    let (assignee, set_assignee) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match validate_one_time_task(&title.get(), &description.get(), &due_date.get(), &assignee.get()) {
            Ok(task) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(task);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    view! {
        <Modal title="New task" on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <label>
                    "Title"
                    <input type="text" prop:value=move || title.get() on:input=move |ev| set_title.set(event_target_value(&ev)) />
                </label>
                <FieldError errors=errors field="title" />
                <label>
                    "Description"
                    <textarea
                        rows="2"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="form-row">
                    <label>
                        "Due"
                        <input type="date" prop:value=move || due_date.get() on:input=move |ev| set_due_date.set(event_target_value(&ev)) />
                        <FieldError errors=errors field="due_date" />
                    </label>
                    <label>
                        "Assignee"
                        <select prop:value=move || assignee.get() on:change=move |ev| set_assignee.set(event_target_value(&ev))>
                            <option value="">"Unassigned"</option>
                            {move || active_presenters(&ctx.reference).into_iter().map(|p| view! {
                                <option value=p.id.to_string()>{p.name}</option>
                            }).collect_view()}
                        </select>
                    </label>
                </div>
                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error label="Create" />
            </form>
        </Modal>
    }
}
