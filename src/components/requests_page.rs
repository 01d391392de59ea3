//! Requests Page Component
//!
//! Purchase requests: filter, workflow actions, create/edit, import.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::confirm_button::ConfirmButton;
use crate::components::error_banner::ErrorBanner;
use crate::components::import_modal::ImportModal;
use crate::components::request_form_modal::RequestFormModal;
use crate::context::AppContext;
use crate::filters::{filter_requests, total_cost, RequestFilter};
use crate::models::{row_key, NewRequest, Request, RequestAction, RequestStatus};
use crate::store::ReferenceDataStoreFields;

#[derive(Debug, Clone, PartialEq)]
enum RequestModal {
    Create,
    Edit(Request),
    Import,
}

fn format_money(value: f64) -> String {
    format!("${:.2}", value)
}

#[component]
pub fn RequestsPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (requests, set_requests) = signal(Vec::<Request>::new());
    let (filter, set_filter) = signal(RequestFilter::default());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (modal, set_modal) = signal::<Option<RequestModal>>(None);
    let (submit_error, set_submit_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let load = move || {
        let client = ctx.client();
        set_loading.set(true);
        spawn_local(async move {
            match api::list_requests(&client, None, "").await {
                Ok(list) => {
                    log::debug!("[REQUESTS] loaded {}", list.len());
                    set_requests.set(list);
                    set_error.set(None);
                }
                Err(err) => set_error.set(Some(ctx.handle_error("load requests", &err))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        load();
    });

    let visible = Memo::new(move |_| requests.with(|all| filter.with(|f| filter_requests(all, f))));

    let open_modal = move |m: RequestModal| {
        set_submit_error.set(None);
        set_submitting.set(false);
        set_modal.set(Some(m));
    };

    let save = move |payload: NewRequest| {
        let editing = modal.with_untracked(|m| match m {
            Some(RequestModal::Edit(r)) => Some(r.id),
            _ => None,
        });
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = match editing {
                Some(id) => api::update_request(&client, id, &payload).await,
                None => api::create_request(&client, &payload).await,
            };
            set_submitting.set(false);
            match result {
                Ok(saved) => {
                    log::info!("[REQUESTS] saved request {}", saved.id);
                    set_modal.set(None);
                    ctx.reload();
                }
                Err(err) => set_submit_error.set(Some(ctx.handle_error("save request", &err))),
            }
        });
    };

    let import = move |rows: Vec<NewRequest>| {
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::submit_request_batch(&client, &rows).await;
            set_submitting.set(false);
            match result {
                Ok(created) => {
                    log::info!("[REQUESTS] imported {} requests", created);
                    set_modal.set(None);
                    ctx.reload();
                }
                Err(err) => set_submit_error.set(Some(ctx.handle_error("import requests", &err))),
            }
        });
    };

    let run_action = move |id: u32, action: RequestAction| {
        let client = ctx.client();
        spawn_local(async move {
            match api::apply_request_action(&client, id, action).await {
                Ok(()) => {
                    log::info!("[REQUESTS] {} request {}", action.endpoint(), id);
                    ctx.reload();
                }
                Err(err) => set_error.set(Some(ctx.handle_error(action.label(), &err))),
            }
        });
    };

    let delete = move |id: u32| {
        let client = ctx.client();
        spawn_local(async move {
            match api::delete_request(&client, id).await {
                Ok(()) => {
                    set_requests.update(|list| list.retain(|r| r.id != id));
                    log::info!("[REQUESTS] deleted request {}", id);
                }
                Err(err) => set_error.set(Some(ctx.handle_error("delete request", &err))),
            }
        });
    };

    let fund_name = move |id: Option<u32>| -> String {
        id.and_then(|id| ctx.reference.funds().with(|funds| funds.iter().find(|f| f.id == id).map(|f| f.name.clone())))
            .unwrap_or_default()
    };

    view! {
        <section class="page requests">
            <div class="page-header">
                <h2>"Purchase requests"</h2>
                <div class="page-actions">
                    <button class="btn" on:click=move |_| open_modal(RequestModal::Import)>"Import"</button>
                    <button class="btn primary" on:click=move |_| open_modal(RequestModal::Create)>"New request"</button>
                </div>
            </div>

            <div class="filter-bar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search item, vendor, catalog #, requester..."
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| set_filter.update(|f| f.search = event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    set_filter.update(|f| f.status = RequestStatus::from_str(&value));
                }>
                    <option value="">"All statuses"</option>
                    {RequestStatus::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str() selected=move || filter.with(|f| f.status == Some(s))>{s.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            <ErrorBanner
                message=error
                on_retry=Callback::new(move |_: ()| load())
                on_dismiss=Callback::new(move |_: ()| set_error.set(None))
            />

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Item"</th>
                        <th>"Vendor"</th>
                        <th>"Qty"</th>
                        <th>"Unit price"</th>
                        <th>"Total"</th>
                        <th>"Fund"</th>
                        <th>"Status"</th>
                        <th>"Requested by"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || visible.get()
                        key=|r| row_key(r.id, r)
                        children=move |r| {
                            let edit_target = r.clone();
                            let id = r.id;
                            view! {
                                <tr>
                                    <td>
                                        {r.item_name.clone()}
                                        {r.catalog_number.clone().map(|c| view! { <span class="muted">{format!(" #{}", c)}</span> })}
                                    </td>
                                    <td>{r.vendor.clone().unwrap_or_default()}</td>
                                    <td>{r.quantity}</td>
                                    <td>{r.unit_price.map(format_money).unwrap_or_default()}</td>
                                    <td>{r.total_cost().map(format_money).unwrap_or_default()}</td>
                                    <td>{fund_name(r.fund)}</td>
                                    <td><span class=format!("status-badge {}", r.status.as_str())>{r.status.label()}</span></td>
                                    <td>{r.requested_by.clone().unwrap_or_default()}</td>
                                    <td class="row-actions">
                                        {r.status.actions().iter().map(|action| {
                                            let action = *action;
                                            if action.needs_confirmation() {
                                                view! {
                                                    <ConfirmButton
                                                        label=action.label()
                                                        prompt=format!("{} this request?", action.label())
                                                        on_confirm=Callback::new(move |_: ()| run_action(id, action))
                                                    />
                                                }
                                                .into_any()
                                            } else {
                                                view! {
                                                    <button class="btn small" on:click=move |_| run_action(id, action)>
                                                        {action.label()}
                                                    </button>
                                                }
                                                .into_any()
                                            }
                                        }).collect_view()}
                                        {r.status.is_editable().then(|| view! {
                                            <button class="btn small" on:click=move |_| open_modal(RequestModal::Edit(edit_target.clone()))>
                                                "Edit"
                                            </button>
                                        })}
                                        <ConfirmButton label="Delete" prompt="Delete this request?" danger=true on_confirm=Callback::new(move |_: ()| delete(id)) />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <p class="item-count">
                {move || {
                    if loading.get() {
                        "Loading...".to_string()
                    } else {
                        visible.with(|list| format!("{} requests, total {}", list.len(), format_money(total_cost(list))))
                    }
                }}
            </p>

            {move || modal.get().map(|m| match m {
                RequestModal::Create => view! {
                    <RequestFormModal
                        initial=None
                        on_submit=Callback::new(save)
                        on_close=Callback::new(move |_: ()| set_modal.set(None))
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                RequestModal::Edit(request) => view! {
                    <RequestFormModal
                        initial=Some(request)
                        on_submit=Callback::new(save)
                        on_close=Callback::new(move |_: ()| set_modal.set(None))
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                RequestModal::Import => view! {
                    <ImportModal
                        on_submit=Callback::new(import)
                        on_close=Callback::new(move |_: ()| set_modal.set(None))
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
            })}
        </section>
    }
}
