//! Recurring Task Modal
//!
//! Create or edit a rotating chore. The assignee list is the rotation
//! pool; the server decides who is current.

use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::components::presenter_avatar::PresenterAvatar;
use crate::context::AppContext;
use crate::models::{NewRecurringTask, RecurringTask, TaskFrequency};
use crate::store::active_presenters;
use crate::validation::{validate_recurring_task, FieldErrors, RecurringTaskForm};

fn form_from(task: &RecurringTask) -> RecurringTaskForm {
    RecurringTaskForm {
        title: task.title.clone(),
        description: task.description.clone().unwrap_or_default(),
        frequency: task.frequency.as_str().to_string(),
        next_due: task.next_due.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        is_active: task.is_active,
        assignee_ids: task.assignees.iter().map(|p| p.id).collect(),
    }
}

#[component]
pub fn RecurringTaskModal(
    /// Task being edited; None creates a new one
    initial: Option<RecurringTask>,
    #[prop(into)] on_submit: Callback<NewRecurringTask>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let title = if initial.is_some() { "Edit recurring task" } else { "New recurring task" };
    let blank = RecurringTaskForm {
        frequency: TaskFrequency::Weekly.as_str().to_string(),
        is_active: true,
        ..Default::default()
    };
    let (form, set_form) = signal(initial.as_ref().map(form_from).unwrap_or(blank));
    let (errors, set_errors) = signal(FieldErrors::new());

    // Inactive presenters already in the pool stay visible so they can be removed
    let candidates = Memo::new(move |_| {
        let mut list = active_presenters(&ctx.reference);
        if let Some(task) = &initial {
            for p in &task.assignees {
                if !list.iter().any(|c| c.id == p.id) {
                    list.push(p.clone());
                }
            }
        }
        list
    });

    let toggle_assignee = move |id: u32, checked: bool| {
        set_form.update(|f| {
            f.assignee_ids.retain(|a| *a != id);
            if checked {
                f.assignee_ids.push(id);
            }
        });
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match form.with(validate_recurring_task) {
            Ok(task) => {
                set_errors.set(FieldErrors::new());
                on_submit.run(task);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    view! {
        <Modal title=title on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <label>
                    "Title"
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.title.clone())
                        on:input=move |ev| set_form.update(|f| f.title = event_target_value(&ev))
                    />
                </label>
                <FieldError errors=errors field="title" />

                <label>
                    "Description"
                    <textarea
                        rows="2"
                        prop:value=move || form.with(|f| f.description.clone())
                        on:input=move |ev| set_form.update(|f| f.description = event_target_value(&ev))
                    ></textarea>
                </label>

                <div class="form-row">
                    <label>
                        "Frequency"
                        <select
                            prop:value=move || form.with(|f| f.frequency.clone())
                            on:change=move |ev| set_form.update(|f| f.frequency = event_target_value(&ev))
                        >
                            {TaskFrequency::ALL.into_iter().map(|freq| view! {
                                <option value=freq.as_str()>{freq.label()}</option>
                            }).collect_view()}
                        </select>
                        <FieldError errors=errors field="frequency" />
                    </label>
                    <label>
                        "Next due"
                        <input
                            type="date"
                            prop:value=move || form.with(|f| f.next_due.clone())
                            on:input=move |ev| set_form.update(|f| f.next_due = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="next_due" />
                    </label>
                </div>

                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.is_active)
                        on:change=move |ev| set_form.update(|f| f.is_active = event_target_checked(&ev))
                    />
                    "Active"
                </label>

                <fieldset class="assignees">
                    <legend>"Rotation"</legend>
                    {move || candidates.get().into_iter().map(|p| {
                        let id = p.id;
                        view! {
                            <label class="checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.assignee_ids.contains(&id))
                                    on:change=move |ev| toggle_assignee(id, event_target_checked(&ev))
                                />
                                <PresenterAvatar presenter=p show_name=true />
                            </label>
                        }
                    }).collect_view()}
                </fieldset>
                <FieldError errors=errors field="assignees" />

                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error />
            </form>
        </Modal>
    }
}
