//! Meetings Page Component
//!
//! Group meeting schedule: search, filters and sort over the loaded list,
//! plus per-meeting swap/postpone/upload and schedule-wide configure,
//! generate and rotate.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

use crate::api;
use crate::components::create_meeting_modal::CreateMeetingModal;
use crate::components::error_banner::ErrorBanner;
use crate::components::generate_modal::GenerateModal;
use crate::components::meeting_config_modal::MeetingConfigModal;
use crate::components::postpone_modal::PostponeModal;
use crate::components::presenter_avatar::PresenterAvatar;
use crate::components::swap_modal::SwapModal;
use crate::components::upload_modal::UploadModal;
use crate::context::AppContext;
use crate::filters::{filter_meetings, today, MeetingFilter, SortOrder, TimeRange};
use crate::markdown::parse_markdown;
use crate::models::{
    GenerateMeetingsRequest, GroupMeeting, MeetingConfiguration, MeetingStatus, MeetingType, NewMeeting,
    PostponeRequest, SwapPresenterRequest, row_key,
};

#[derive(Debug, Clone, PartialEq)]
enum MeetingModal {
    Create,
    Swap(GroupMeeting),
    Postpone(GroupMeeting),
    Upload(GroupMeeting),
    Configure,
    Generate,
}

fn time_span(m: &GroupMeeting) -> String {
    match (m.start_time, m.end_time) {
        (Some(start), Some(end)) => format!("{}–{}", start.format("%H:%M"), end.format("%H:%M")),
        (Some(start), None) => start.format("%H:%M").to_string(),
        _ => String::new(),
    }
}

#[component]
pub fn MeetingsPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (meetings, set_meetings) = signal(Vec::<GroupMeeting>::new());
    let (filter, set_filter) = signal(MeetingFilter::default());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (modal, set_modal) = signal::<Option<MeetingModal>>(None);
    let (submit_error, set_submit_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let load = move || {
        let client = ctx.client();
        set_loading.set(true);
        spawn_local(async move {
            match api::list_meetings(&client).await {
                Ok(list) => {
                    log::debug!("[MEETINGS] loaded {}", list.len());
                    set_meetings.set(list);
                    set_error.set(None);
                }
                Err(err) => set_error.set(Some(ctx.handle_error("load meetings", &err))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        load();
    });

    let visible = Memo::new(move |_| meetings.with(|all| filter.with(|f| filter_meetings(all, f, today()))));

    let open_modal = move |m: MeetingModal| {
        set_submit_error.set(None);
        set_submitting.set(false);
        set_notice.set(None);
        set_modal.set(Some(m));
    };

    // Shared tail of every modal submit: close + reload on success, keep the modal open on failure
    let finish = move |context: &'static str, result: Result<String, crate::error::ApiError>| {
        set_submitting.set(false);
        match result {
            Ok(message) => {
                log::info!("[MEETINGS] {}", message);
                set_notice.set(Some(message));
                set_modal.set(None);
                ctx.reload();
            }
            Err(err) => set_submit_error.set(Some(ctx.handle_error(context, &err))),
        }
    };

    let modal_meeting_id = move || {
        modal.with_untracked(|m| match m {
            Some(MeetingModal::Swap(m) | MeetingModal::Postpone(m) | MeetingModal::Upload(m)) => Some(m.id),
            _ => None,
        })
    };

    let create = move |meeting: NewMeeting| {
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::create_meeting(&client, &meeting).await;
            finish("create meeting", result.map(|m| format!("Created meeting on {}", m.date)));
        });
    };

    let swap = move |request: SwapPresenterRequest| {
        let Some(id) = modal_meeting_id() else { return };
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::swap_presenter(&client, id, &request).await;
            finish("swap presenter", result.map(|()| "Presenters swapped".to_string()));
        });
    };

    let postpone = move |request: PostponeRequest| {
        let Some(id) = modal_meeting_id() else { return };
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::postpone_meeting(&client, id, &request).await;
            finish("postpone meeting", result.map(|m| format!("Meeting moved to {}", m.date)));
        });
    };

    let upload = move |file: File| {
        let Some(id) = modal_meeting_id() else { return };
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::upload_material(&client, id, &file).await;
            finish("upload material", result.map(|m| format!("Uploaded {}", m.name)));
        });
    };

    let configure = move |config: MeetingConfiguration| {
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::update_meeting_configuration(&client, &config).await;
            finish("save configuration", result.map(|_| "Configuration saved".to_string()));
        });
    };

    let generate = move |range: GenerateMeetingsRequest| {
        let client = ctx.client();
        set_submitting.set(true);
        spawn_local(async move {
            let result = api::generate_meetings(&client, &range).await;
            finish("generate meetings", result.map(|created| format!("Generated {} meetings", created.len())));
        });
    };

    let rotate = move |_| {
        let client = ctx.client();
        spawn_local(async move {
            match api::rotate_presenters(&client).await {
                Ok(()) => {
                    log::info!("[MEETINGS] presenters rotated");
                    set_notice.set(Some("Presenter rotation updated".into()));
                    ctx.reload();
                }
                Err(err) => set_error.set(Some(ctx.handle_error("rotate presenters", &err))),
            }
        });
    };

    let close_modal = Callback::new(move |_: ()| set_modal.set(None));

    view! {
        <section class="page meetings">
            <div class="page-header">
                <h2>"Group meetings"</h2>
                <div class="page-actions">
                    <button class="btn" on:click=move |_| open_modal(MeetingModal::Configure)>"Configure"</button>
                    <button class="btn" on:click=move |_| open_modal(MeetingModal::Generate)>"Generate"</button>
                    <button class="btn" on:click=rotate>"Rotate presenters"</button>
                    <button class="btn primary" on:click=move |_| open_modal(MeetingModal::Create)>"New meeting"</button>
                </div>
            </div>

            <div class="filter-bar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search title, presenter, location..."
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| set_filter.update(|f| f.search = event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    set_filter.update(|f| f.range = TimeRange::from_str(&value));
                }>
                    {TimeRange::ALL.into_iter().map(|r| view! {
                        <option value=r.as_str() selected=move || filter.with(|f| f.range == r)>{r.label()}</option>
                    }).collect_view()}
                </select>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    set_filter.update(|f| f.meeting_type = MeetingType::from_str(&value));
                }>
                    <option value="">"All types"</option>
                    {MeetingType::ALL.into_iter().map(|t| view! {
                        <option value=t.as_str()>{t.label()}</option>
                    }).collect_view()}
                </select>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    set_filter.update(|f| f.status = MeetingStatus::from_str(&value));
                }>
                    <option value="">"All statuses"</option>
                    {MeetingStatus::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str()>{s.label()}</option>
                    }).collect_view()}
                </select>
                <button
                    class="btn"
                    title="Toggle sort order"
                    on:click=move |_| set_filter.update(|f| f.order = f.order.toggled())
                >
                    {move || if filter.with(|f| f.order == SortOrder::Ascending) { "Date ↑" } else { "Date ↓" }}
                </button>
            </div>

            <ErrorBanner
                message=error
                on_retry=Callback::new(move |_: ()| load())
                on_dismiss=Callback::new(move |_: ()| set_error.set(None))
            />
            {move || notice.get().map(|msg| view! { <div class="notice">{msg}</div> })}

            <div class="meeting-list">
                <For
                    each=move || visible.get()
                    key=|m| row_key(m.id, m)
                    children=move |m| {
                        let actionable = m.is_actionable(today());
                        let for_swap = m.clone();
                        let for_postpone = m.clone();
                        let for_upload = m.clone();
                        let description = m.description.as_deref().map(parse_markdown);
                        view! {
                            <article class=format!("meeting-card {}", m.status.as_str())>
                                <header class="meeting-header">
                                    <div>
                                        <span class="meeting-date">{m.date.format("%a %b %-d, %Y").to_string()}</span>
                                        <span class="muted">{format!(" {}", time_span(&m))}</span>
                                    </div>
                                    <span class=format!("type-badge {}", m.meeting_type.as_str())>{m.meeting_type.label()}</span>
                                    <span class=format!("status-badge {}", m.status.as_str())>{m.status.label()}</span>
                                </header>
                                <h3>{m.display_title()}</h3>
                                {m.location.clone().map(|loc| view! { <p class="muted">{loc}</p> })}
                                <div class="presenters">
                                    {m.presenters.iter().cloned().map(|p| view! { <PresenterAvatar presenter=p show_name=true /> }).collect_view()}
                                </div>
                                {description.map(|html| view! { <div class="markdown" inner_html=html></div> })}
                                {(!m.materials.is_empty()).then(|| view! {
                                    <ul class="materials">
                                        {m.materials.iter().map(|mat| view! {
                                            <li><a href=mat.url.clone() target="_blank" rel="noopener">{mat.name.clone()}</a></li>
                                        }).collect_view()}
                                    </ul>
                                })}
                                <Show when=move || actionable>
                                    <div class="row-actions">
                                        <button class="btn small" on:click={
                                            let m = for_swap.clone();
                                            move |_| open_modal(MeetingModal::Swap(m.clone()))
                                        }>"Swap"</button>
                                        <button class="btn small" on:click={
                                            let m = for_postpone.clone();
                                            move |_| open_modal(MeetingModal::Postpone(m.clone()))
                                        }>"Postpone"</button>
                                        <button class="btn small" on:click={
                                            let m = for_upload.clone();
                                            move |_| open_modal(MeetingModal::Upload(m.clone()))
                                        }>"Upload"</button>
                                    </div>
                                </Show>
                            </article>
                        }
                    }
                />
            </div>

            <p class="item-count">
                {move || if loading.get() { "Loading...".to_string() } else { format!("{} meetings", visible.with(Vec::len)) }}
            </p>

            {move || modal.get().map(|m| match m {
                MeetingModal::Create => view! {
                    <CreateMeetingModal
                        on_submit=Callback::new(create)
                        on_close=close_modal
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                MeetingModal::Swap(meeting) => {
                    let candidates = meetings.with_untracked(|all| {
                        all.iter().filter(|m| m.is_actionable(today())).cloned().collect::<Vec<_>>()
                    });
                    view! {
                        <SwapModal
                            meeting=meeting
                            candidates=candidates
                            on_submit=Callback::new(swap)
                            on_close=close_modal
                            submit_error=submit_error
                            submitting=submitting
                        />
                    }.into_any()
                }
                MeetingModal::Postpone(meeting) => view! {
                    <PostponeModal
                        meeting=meeting
                        on_submit=Callback::new(postpone)
                        on_close=close_modal
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                MeetingModal::Upload(meeting) => view! {
                    <UploadModal
                        meeting=meeting
                        on_submit=Callback::new(upload)
                        on_close=close_modal
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                MeetingModal::Configure => view! {
                    <MeetingConfigModal
                        on_submit=Callback::new(configure)
                        on_close=close_modal
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
                MeetingModal::Generate => view! {
                    <GenerateModal
                        on_submit=Callback::new(generate)
                        on_close=close_modal
                        submit_error=submit_error
                        submitting=submitting
                    />
                }.into_any(),
            })}
        </section>
    }
}
