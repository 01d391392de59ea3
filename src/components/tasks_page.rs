//! Tasks Page Component
//!
//! Recurring (rotating) chores and one-off tasks side by side.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, ApiClient};
use crate::components::confirm_button::ConfirmButton;
use crate::components::error_banner::ErrorBanner;
use crate::components::one_time_task_modal::OneTimeTaskModal;
use crate::components::presenter_avatar::PresenterAvatar;
use crate::components::recurring_task_modal::RecurringTaskModal;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::filters::{filter_one_time_tasks, filter_recurring_tasks, today};
use crate::markdown::parse_markdown_inline;
use crate::models::{row_key, NewOneTimeTask, NewRecurringTask, OneTimeTask, RecurringTask};

#[derive(Debug, Clone, PartialEq)]
enum TaskModal {
    NewRecurring,
    EditRecurring(RecurringTask),
    NewOneTime,
}

#[derive(Debug, Clone, Copy)]
enum RowAction {
    Rotate(u32),
    DeleteRecurring(u32),
    Complete(u32),
    DeleteOneTime(u32),
}

impl RowAction {
    fn label(self) -> &'static str {
        match self {
            RowAction::Rotate(_) => "rotate task",
            RowAction::DeleteRecurring(_) => "delete recurring task",
            RowAction::Complete(_) => "complete task",
            RowAction::DeleteOneTime(_) => "delete task",
        }
    }

    async fn run(self, client: &ApiClient) -> Result<(), ApiError> {
        match self {
            RowAction::Rotate(id) => api::rotate_recurring_task(client, id).await,
            RowAction::DeleteRecurring(id) => api::delete_recurring_task(client, id).await,
            RowAction::Complete(id) => api::complete_one_time_task(client, id).await,
            RowAction::DeleteOneTime(id) => api::delete_one_time_task(client, id).await,
        }
    }
}

fn format_due(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn TasksPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (recurring, set_recurring) = signal(Vec::<RecurringTask>::new());
    let (one_time, set_one_time) = signal(Vec::<OneTimeTask>::new());
    let (search, set_search) = signal(String::new());
    let (show_inactive, set_show_inactive) = signal(false);
    let (show_completed, set_show_completed) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (modal, set_modal) = signal::<Option<TaskModal>>(None);
    let (submit_error, set_submit_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let load = move || {
        let client = ctx.client();
        set_loading.set(true);
        spawn_local(async move {
            match api::list_recurring_tasks(&client).await {
                Ok(list) => set_recurring.set(list),
                Err(err) => set_error.set(Some(ctx.handle_error("load recurring tasks", &err))),
            }
            match api::list_one_time_tasks(&client).await {
                Ok(list) => set_one_time.set(list),
                Err(err) => set_error.set(Some(ctx.handle_error("load tasks", &err))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        load();
    });

    let visible_recurring =
        Memo::new(move |_| recurring.with(|all| filter_recurring_tasks(all, &search.get(), show_inactive.get())));
    let visible_one_time =
        Memo::new(move |_| one_time.with(|all| filter_one_time_tasks(all, &search.get(), show_completed.get())));

    let open_modal = move |m: TaskModal| {
        set_submit_error.set(None);
        set_submitting.set(false);
        set_modal.set(Some(m));
    };

    let finish = move |context: &'static str, result: Result<(), ApiError>| {
        set_submitting.set(false);
        match result {
            Ok(()) => {
                set_modal.set(None);
                ctx.reload();
            }
            Err(err) => set_submit_error.set(Some(ctx.handle_error(context, &err))),
        }
    };

    let save_recurring = move |task: NewRecurringTask| {
        let editing = modal.with_untracked(|m| match m {
            Some(TaskModal::EditRecurring(t)) => Some(t.id),
            _ => None,
        });
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = match editing {
                Some(id) => api::update_recurring_task(&client, id, &task).await,
                None => api::create_recurring_task(&client, &task).await,
            };
            if let Ok(saved) = &result {
                log::info!("[TASKS] saved recurring task {}", saved.id);
            }
            finish("save recurring task", result.map(|_| ()));
        });
    };

    let save_one_time = move |task: NewOneTimeTask| {
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::create_one_time_task(&client, &task).await;
            if let Ok(saved) = &result {
                log::info!("[TASKS] created task {}", saved.id);
            }
            finish("create task", result.map(|_| ()));
        });
    };

    // Row actions report into the page banner
    let row_action = move |action: RowAction| {
        let client = ctx.client();
        spawn_local(async move {
            match action.run(&client).await {
                Ok(()) => {
                    log::info!("[TASKS] {:?}", action);
                    ctx.reload();
                }
                Err(err) => set_error.set(Some(ctx.handle_error(action.label(), &err))),
            }
        });
    };

    view! {
        <section class="page tasks">
            <div class="page-header">
                <h2>"Tasks"</h2>
                <div class="page-actions">
                    <button class="btn" on:click=move |_| open_modal(TaskModal::NewOneTime)>"New task"</button>
                    <button class="btn primary" on:click=move |_| open_modal(TaskModal::NewRecurring)>"New recurring task"</button>
                </div>
            </div>

            <div class="filter-bar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search title, description, assignee..."
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <label class="checkbox">
                    <input type="checkbox" prop:checked=move || show_inactive.get() on:change=move |ev| set_show_inactive.set(event_target_checked(&ev)) />
                    "Show inactive"
                </label>
                <label class="checkbox">
                    <input type="checkbox" prop:checked=move || show_completed.get() on:change=move |ev| set_show_completed.set(event_target_checked(&ev)) />
                    "Show completed"
                </label>
            </div>

            <ErrorBanner
                message=error
                on_retry=Callback::new(move |_: ()| load())
                on_dismiss=Callback::new(move |_: ()| set_error.set(None))
            />
            <Show when=move || loading.get()>
                <p class="muted">"Loading..."</p>
            </Show>

            <h3>"Recurring"</h3>
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Task"</th>
                        <th>"Frequency"</th>
                        <th>"Next due"</th>
                        <th>"Current"</th>
                        <th>"Rotation"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || visible_recurring.get()
                        key=|t| row_key(t.id, t)
                        children=move |t| {
                            let id = t.id;
                            let edit_target = t.clone();
                            view! {
                                <tr class:inactive=!t.is_active>
                                    <td>
                                        {t.title.clone()}
                                        {t.description.as_deref().map(|d| view! { <div class="muted markdown" inner_html=parse_markdown_inline(d)></div> })}
                                    </td>
                                    <td>{t.frequency.label()}</td>
                                    <td>{format_due(t.next_due)}</td>
                                    <td>
                                        {t.current_assignee.clone().map(|p| view! { <PresenterAvatar presenter=p show_name=true /> })}
                                    </td>
                                    <td class="presenters">
                                        {t.assignees.iter().cloned().map(|p| view! { <PresenterAvatar presenter=p /> }).collect_view()}
                                    </td>
                                    <td class="row-actions">
                                        <button class="btn small" disabled=!t.is_active on:click=move |_| row_action(RowAction::Rotate(id))>"Rotate"</button>
                                        <button class="btn small" on:click=move |_| open_modal(TaskModal::EditRecurring(edit_target.clone()))>
                                            "Edit"
                                        </button>
                                        <ConfirmButton label="Delete" prompt="Delete task and its rotation?" danger=true on_confirm=Callback::new(move |_: ()| row_action(RowAction::DeleteRecurring(id))) />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <h3>"One-time"</h3>
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Task"</th>
                        <th>"Due"</th>
                        <th>"Assignee"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || visible_one_time.get()
                        key=|t| row_key(t.id, t)
                        children=move |t| {
                            let id = t.id;
                            let overdue = t.is_overdue(today());
                            view! {
                                <tr class:overdue=overdue class:completed=t.completed>
                                    <td>
                                        {t.title.clone()}
                                        {t.description.as_deref().map(|d| view! { <div class="muted markdown" inner_html=parse_markdown_inline(d)></div> })}
                                    </td>
                                    <td>
                                        {format_due(t.due_date)}
                                        {overdue.then(|| view! { <span class="badge warn">"Overdue"</span> })}
                                    </td>
                                    <td>{t.assignee.clone().map(|p| view! { <PresenterAvatar presenter=p show_name=true /> })}</td>
                                    <td class="row-actions">
                                        {(!t.completed).then(|| view! {
                                            <button class="btn small" on:click=move |_| row_action(RowAction::Complete(id))>"Complete"</button>
                                        })}
                                        <ConfirmButton label="Delete" prompt="Delete task?" danger=true on_confirm=Callback::new(move |_: ()| row_action(RowAction::DeleteOneTime(id))) />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            {move || modal.get().map(|m| match m {
                TaskModal::NewRecurring => view! {
                    <RecurringTaskModal
                        initial=None
                        on_submit=Callback::new(save_recurring)
                        on_close=Callback::new(move |_: ()| set_modal.set(None))
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                TaskModal::EditRecurring(task) => view! {
                    <RecurringTaskModal
                        initial=Some(task)
                        on_submit=Callback::new(save_recurring)
                        on_close=Callback::new(move |_: ()| set_modal.set(None))
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                TaskModal::NewOneTime => view! {
                    <OneTimeTaskModal
                        on_submit=Callback::new(save_one_time)
                        on_close=Callback::new(move |_: ()| set_modal.set(None))
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
            })}
        </section>
    }
}
