//! Import Modal
//!
//! Pick a CSV/XLSX file, preview which rows are valid, and submit only
//! those.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::modal::Modal;
use crate::context::AppContext;
use crate::import::{build_preview, read_import_file, ImportPreview};
use crate::models::NewRequest;
use crate::store::ReferenceDataStoreFields;

#[component]
pub fn ImportModal(
    #[prop(into)] on_submit: Callback<Vec<NewRequest>>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (preview, set_preview) = signal::<Option<ImportPreview>>(None);
    let (file_name, set_file_name) = signal::<Option<String>>(None);
    let (read_error, set_read_error) = signal::<Option<String>>(None);
    let (reading, set_reading) = signal(false);

    let on_file = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        set_preview.set(None);
        set_read_error.set(None);
        set_file_name.set(Some(file.name()));
        set_reading.set(true);
        log::info!("[IMPORT] reading {} ({} bytes)", file.name(), file.size());

        spawn_local(async move {
            let funds = ctx.reference.funds().get_untracked();
            let result = match read_import_file(&file).await {
                Ok(rows) => build_preview(&rows, &funds),
                Err(err) => Err(err),
            };
            match result {
                Ok(p) => set_preview.set(Some(p)),
                Err(err) => {
                    log::warn!("[IMPORT] {}", err);
                    set_read_error.set(Some(err.to_string()));
                }
            }
            set_reading.set(false);
        });
    };

    let submit = move |_| {
        let rows = preview.with(|p| p.as_ref().map(|p| p.valid_rows.clone()).unwrap_or_default());
        if !rows.is_empty() {
            on_submit.run(rows);
        }
    };

    let can_submit = move || !submitting.get() && preview.with(|p| p.as_ref().is_some_and(ImportPreview::can_submit));

    view! {
        <Modal title="Import requests" on_close=on_close wide=true>
            <div class="import">
                <p class="muted">
                    "CSV or XLSX with a header row. Required columns: item name, quantity. "
                    "Optional: catalog number, vendor, unit price, fund, notes."
                </p>
                <input type="file" accept=".csv,.xlsx,.xls" on:change=on_file />
                {move || file_name.get().map(|name| view! { <p class="file-name">{name}</p> })}
                <Show when=move || reading.get()>
                    <p class="muted">"Reading file..."</p>
                </Show>
                {move || read_error.get().map(|msg| view! { <div class="error-banner" role="alert">{msg}</div> })}

                {move || preview.get().map(|p| view! {
                    <div class="import-preview">
                        <p class="import-summary">
                            {format!(
                                "{} rows: {} valid, {} with errors",
                                p.total_rows,
                                p.valid_rows.len(),
                                p.invalid_rows.len()
                            )}
                        </p>
                        {(!p.unknown_columns.is_empty()).then(|| view! {
                            <p class="muted">{format!("Ignored columns: {}", p.unknown_columns.join(", "))}</p>
                        })}
                        {(!p.invalid_rows.is_empty()).then(|| view! {
                            <ul class="invalid-rows">
                                {p.invalid_rows.iter().map(|row| view! {
                                    <li>
                                        <strong>{format!("Row {}", row.row_number)}</strong>
                                        ": "
                                        {row.errors.join("; ")}
                                    </li>
                                }).collect_view()}
                            </ul>
                        })}
                        <table class="data-table compact">
                            <thead>
                                <tr><th>"Item"</th><th>"Qty"</th><th>"Unit price"</th><th>"Vendor"</th></tr>
                            </thead>
                            <tbody>
                                {p.valid_rows.iter().map(|r| view! {
                                    <tr>
                                        <td>{r.item_name.clone()}</td>
                                        <td>{r.quantity}</td>
                                        <td>{r.unit_price.map(|p| format!("{:.2}", p)).unwrap_or_default()}</td>
                                        <td>{r.vendor.clone().unwrap_or_default()}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                })}

                {move || submit_error.get().map(|msg| view! { <div class="error-banner" role="alert">{msg}</div> })}

                <div class="form-actions">
                    <button type="button" class="btn" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="button" class="btn primary" disabled=move || !can_submit() on:click=submit>
                        {move || {
                            let count = preview.with(|p| p.as_ref().map_or(0, |p| p.valid_rows.len()));
                            if submitting.get() { "Importing...".to_string() } else { format!("Import {} rows", count) }
                        }}
                    </button>
                </div>
            </div>
        </Modal>
    }
}
