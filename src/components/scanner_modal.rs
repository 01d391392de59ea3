//! Scanner Modal Component
//!
//! Camera (or manual) code entry → server lookup → confirmation.
//!
//! The `<video>` element stays mounted for the modal's whole life so the
//! camera can be reopened on "Scan again"; it is hidden outside camera
//! mode. Leaving camera mode, closing the modal and unmounting all
//! release the camera, and an in-flight lookup is aborted on close.

use leptos::html::Video;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_scanner::{use_camera_scanner, ScanError, ScanEvent, ScannerOptions};
use web_sys::AbortController;

use crate::api;
use crate::components::modal::Modal;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::models::Item;
use crate::scan::{resolve_lookup, LookupOutcome};

#[derive(Debug, Clone, PartialEq)]
enum ScanView {
    Camera,
    Manual,
    Looking { code: String },
    Result { code: String, outcome: LookupOutcome },
    LookupFailed { code: String, message: String, retryable: bool },
}

/// Barcode scanner with confirmation step
///
/// Props:
/// - on_confirm: runs with the confirmed item, then the modal closes
/// - on_close: closes the modal
#[component]
pub fn ScannerModal(
    #[prop(into)] on_confirm: Callback<Item>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let scanner = use_camera_scanner();
    let video_ref = NodeRef::<Video>::new();

    let (view_state, set_view_state) = signal(ScanView::Camera);
    let (banner, set_banner) = signal::<Option<String>>(None);
    let (manual_code, set_manual_code) = signal(String::new());
    let (manual_error, set_manual_error) = signal::<Option<String>>(None);
    // Bumped to reopen the camera after a non-fatal failure
    let (camera_attempt, set_camera_attempt) = signal(0u32);
    let camera_mode = Memo::new(move |_| view_state.with(|v| matches!(v, ScanView::Camera)));

    // Lookup cancellation
    let abort = StoredValue::new_local(None::<AbortController>);
    let cancel_lookup = move || {
        if let Some(Some(controller)) = abort.try_update_value(|slot| slot.take()) {
            controller.abort();
            log::debug!("[SCAN] lookup aborted");
        }
    };
    on_cleanup(cancel_lookup);

    let lookup = move |code: String| {
        cancel_lookup();
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(AbortController::signal);
        abort.set_value(controller);
        set_view_state.set(ScanView::Looking { code: code.clone() });
        let client = ctx.client();
        log::info!("[SCAN] looking up {}", code);
        spawn_local(async move {
            let result = api::lookup_items(&client, &code, signal.as_ref()).await;
            let next = match result {
                // Superseded or closed: leave state alone
                Err(ApiError::Aborted) => return,
                Ok(items) => {
                    let outcome = resolve_lookup(&code, items);
                    log::info!("[SCAN] {}: {}", code, outcome.message());
                    ScanView::Result { code, outcome }
                }
                Err(err) => {
                    let message = ctx.handle_error("item lookup", &err);
                    ScanView::LookupFailed { code, message, retryable: err.is_retryable() }
                }
            };
            abort.try_update_value(|slot| *slot = None);
            set_view_state.set(next);
        });
    };

    let fall_back = move |err: ScanError| {
        log::warn!("[SCAN] {}", err);
        scanner.close();
        if err.falls_back_to_manual() {
            set_banner.set(Some(format!("{}. Enter the code by hand.", err)));
            set_view_state.set(ScanView::Manual);
        } else {
            set_banner.set(Some(err.to_string()));
        }
    };

    let on_event = move |event: ScanEvent| match event {
        ScanEvent::Rejected { reason, .. } => {
            set_banner.set(Some(format!("{}. Hold steady, rescanning...", reason)));
        }
        ScanEvent::Resumed => set_banner.set(None),
        ScanEvent::Accepted(detection) => {
            scanner.close();
            set_banner.set(None);
            lookup(detection.raw_value);
        }
        ScanEvent::Failed(err) => fall_back(err),
    };

    // Camera follows the mode: open when entering camera mode, release when leaving
    Effect::new(move |_| {
        let _ = camera_attempt.get();
        let Some(video) = video_ref.get() else { return };
        if camera_mode.get() {
            scanner.open(video, ScannerOptions::default(), on_event, fall_back);
        } else {
            scanner.close();
        }
    });

    let switch_to_manual = move |_| {
        scanner.close();
        set_banner.set(None);
        set_view_state.set(ScanView::Manual);
    };

    let scan_again = move || {
        cancel_lookup();
        set_banner.set(None);
        set_manual_error.set(None);
        set_view_state.set(ScanView::Camera);
        set_camera_attempt.update(|n| *n += 1);
    };

    let submit_manual = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let code = manual_code.get().trim().to_string();
        if code.is_empty() {
            set_manual_error.set(Some("Enter a barcode or catalog number".into()));
            return;
        }
        set_manual_error.set(None);
        lookup(code);
    };

    let close = move || {
        cancel_lookup();
        scanner.close();
        on_close.run(());
    };

    let confirm = move |item: Item| {
        log::info!("[SCAN] confirmed item {}", item.id);
        on_confirm.run(item);
        close();
    };

    view! {
        <Modal title="Scan item" on_close=Callback::new(move |_: ()| close())>
            <div class="scanner">
                {move || banner.get().map(|msg| view! { <div class="scan-banner">{msg}</div> })}

                <div class="scanner-video" class:hidden=move || !camera_mode.get()>
                    <video node_ref=video_ref autoplay=true muted=true></video>
                    <div class="scanner-actions">
                        <button type="button" class="btn" on:click=switch_to_manual>"Enter manually"</button>
                        <Show when=move || !scanner.is_open() && banner.get().is_some()>
                            <button type="button" class="btn" on:click=move |_| scan_again()>"Retry camera"</button>
                        </Show>
                    </div>
                </div>

                {move || match view_state.get() {
                    ScanView::Camera => ().into_any(),
                    ScanView::Manual => view! {
                        <form class="manual-entry" on:submit=submit_manual>
                            <label>
                                "Barcode"
                                <input
                                    type="text"
                                    autofocus=true
                                    prop:value=move || manual_code.get()
                                    on:input=move |ev| set_manual_code.set(event_target_value(&ev))
                                />
                            </label>
                            {move || manual_error.get().map(|msg| view! { <p class="field-error">{msg}</p> })}
                            <div class="form-actions">
                                <button type="button" class="btn" on:click=move |_| scan_again()>"Use camera"</button>
                                <button type="submit" class="btn primary">"Look up"</button>
                            </div>
                        </form>
                    }.into_any(),
                    ScanView::Looking { code } => view! {
                        <p class="scan-status">"Looking up " <code>{code}</code> "..."</p>
                    }.into_any(),
                    ScanView::LookupFailed { code, message, retryable } => {
                        let retry_code = code.clone();
                        view! {
                            <div class="scan-result">
                                <div class="error-banner" role="alert">{message}</div>
                                <div class="form-actions">
                                    <button type="button" class="btn" on:click=move |_| scan_again()>"Scan again"</button>
                                    {retryable.then(|| view! {
                                        <button type="button" class="btn primary" on:click=move |_| lookup(retry_code.clone())>
                                            "Retry lookup"
                                        </button>
                                    })}
                                </div>
                                <p class="muted">"Code: " <code>{code}</code></p>
                            </div>
                        }.into_any()
                    }
                    ScanView::Result { code, outcome } => {
                        let can_confirm = outcome.can_confirm();
                        let message = outcome.message();
                        let item = outcome.item().cloned();
                        let confirm_item = item.clone();
                        view! {
                            <div class="scan-result">
                                <p class="muted">"Code: " <code>{code}</code></p>
                                <p class={if can_confirm { "scan-message ok" } else { "scan-message warn" }}>{message}</p>
                                {item.map(|item| view! {
                                    <dl class="item-details">
                                        <dt>"Name"</dt><dd>{item.name}</dd>
                                        <dt>"Catalog #"</dt><dd>{item.catalog_number.unwrap_or_default()}</dd>
                                        <dt>"Location"</dt><dd>{item.location.unwrap_or_default()}</dd>
                                        <dt>"Quantity"</dt>
                                        <dd>{format!("{} {}", item.quantity, item.unit.unwrap_or_default())}</dd>
                                    </dl>
                                })}
                                <div class="form-actions">
                                    <button type="button" class="btn" on:click=move |_| scan_again()>"Scan again"</button>
                                    {confirm_item.filter(|_| can_confirm).map(|item| view! {
                                        <button type="button" class="btn primary" on:click=move |_| confirm(item.clone())>
                                            "Confirm check-out"
                                        </button>
                                    })}
                                </div>
                            </div>
                        }.into_any()
                    }
                }}
            </div>
        </Modal>
    }
}
