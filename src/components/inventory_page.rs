//! Inventory Page Component
//!
//! Item search with a debounced query box and the scan-to-check-out flow.

use std::time::Duration;

use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::error_banner::ErrorBanner;
use crate::components::scanner_modal::ScannerModal;
use crate::context::AppContext;
use crate::models::{row_key, Item};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[component]
pub fn InventoryPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (items, set_items) = signal(Vec::<Item>::new());
    let (query, set_query) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (scanning, set_scanning) = signal(false);
    // Latest search wins; older responses are ignored
    let search_seq = StoredValue::new(0u64);

    let run_search = move |text: String, debounce: bool| {
        let Some(seq) = search_seq.try_update_value(|n| {
            *n += 1;
            *n
        }) else {
            return;
        };
        let client = ctx.client();
        spawn_local(async move {
            if debounce {
                sleep(SEARCH_DEBOUNCE).await;
            }
            if search_seq.try_get_value() != Some(seq) {
                return;
            }
            set_loading.set(true);
            let result = api::search_items(&client, &text).await;
            if search_seq.try_get_value() != Some(seq) {
                return;
            }
            match result {
                Ok(found) => {
                    log::debug!("[INVENTORY] {} items for {:?}", found.len(), text);
                    set_items.set(found);
                    set_error.set(None);
                }
                Err(err) => set_error.set(Some(ctx.handle_error("item search", &err))),
            }
            set_loading.set(false);
        });
    };

    // Reload on mount and whenever something changed server-side
    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        run_search(query.get_untracked(), false);
    });

    let on_input = move |ev: web_sys::Event| {
        let text = event_target_value(&ev);
        set_query.set(text.clone());
        run_search(text, true);
    };

    let check_out = move |item: Item| {
        let client = ctx.client();
        spawn_local(async move {
            match api::check_out_item(&client, item.id).await {
                Ok(()) => {
                    log::info!("[INVENTORY] checked out item {}", item.id);
                    // Report the server's view of the item after check-out
                    let message = match api::get_item(&client, item.id).await {
                        Ok(updated) if updated.is_archived => format!("Checked out {}", updated.name),
                        Ok(updated) => {
                            let left = format!("{} {}", updated.quantity, updated.unit.unwrap_or_default());
                            format!("Checked out {} ({} left)", updated.name, left.trim_end())
                        }
                        Err(err) => {
                            log::warn!("[INVENTORY] refresh item {}: {}", item.id, err);
                            format!("Checked out {}", item.name)
                        }
                    };
                    set_notice.set(Some(message));
                    ctx.reload();
                }
                Err(err) => set_error.set(Some(ctx.handle_error("check-out", &err))),
            }
        });
    };

    view! {
        <section class="page inventory">
            <div class="page-header">
                <h2>"Inventory"</h2>
                <div class="page-actions">
                    <input
                        type="search"
                        class="search-input"
                        placeholder="Search name, barcode, catalog #..."
                        prop:value=move || query.get()
                        on:input=on_input
                    />
                    <button class="btn primary" on:click=move |_| {
                        set_notice.set(None);
                        set_scanning.set(true);
                    }>
                        "Scan"
                    </button>
                </div>
            </div>

            <ErrorBanner
                message=error
                on_retry=Callback::new(move |_: ()| run_search(query.get_untracked(), false))
                on_dismiss=Callback::new(move |_: ()| set_error.set(None))
            />
            {move || notice.get().map(|msg| view! { <div class="notice">{msg}</div> })}

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Barcode"</th>
                        <th>"Location"</th>
                        <th>"Quantity"</th>
                        <th>"Expires"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || items.get()
                        key=|item| row_key(item.id, item)
                        children=move |item| view! {
                            <tr class:archived=item.is_archived>
                                <td>
                                    {item.name.clone()}
                                    {item.is_archived.then(|| view! { <span class="badge muted">"Checked out"</span> })}
                                </td>
                                <td><code>{item.barcode.clone().unwrap_or_default()}</code></td>
                                <td>{item.location.clone().unwrap_or_default()}</td>
                                <td>{format!("{} {}", item.quantity, item.unit.clone().unwrap_or_default())}</td>
                                <td>{item.expiration_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()}</td>
                            </tr>
                        }
                    />
                </tbody>
            </table>
            <p class="item-count">
                {move || if loading.get() { "Loading...".to_string() } else { format!("{} items", items.with(Vec::len)) }}
            </p>

            <Show when=move || scanning.get()>
                <ScannerModal
                    on_confirm=Callback::new(check_out)
                    on_close=Callback::new(move |_: ()| set_scanning.set(false))
                />
            </Show>
        </section>
    }
}
