//! Swap Presenter Modal
//!
//! Exchange one presenter of this meeting with a presenter of another
//! meeting. The swap itself happens on the server.

use leptos::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::models::{GroupMeeting, SwapPresenterRequest};
use crate::validation::FieldErrors;

fn meeting_label(m: &GroupMeeting) -> String {
    let names = m.presenter_names();
    format!(
        "{} · {}{}",
        m.date.format("%a %Y-%m-%d"),
        m.display_title(),
        if names.is_empty() { String::new() } else { format!(" ({})", names) }
    )
}

#[component]
pub fn SwapModal(
    meeting: GroupMeeting,
    /// Meetings that can take part in the swap
    candidates: Vec<GroupMeeting>,
    #[prop(into)] on_submit: Callback<SwapPresenterRequest>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let candidates: Vec<GroupMeeting> = candidates
        .into_iter()
        .filter(|m| m.id != meeting.id && !m.presenters.is_empty())
        .collect();
    let candidates = StoredValue::new(candidates);
    let own_presenters = meeting.presenters.clone();

    let (presenter_id, set_presenter_id) = signal(own_presenters.first().map(|p| p.id));
    let (target_meeting, set_target_meeting) = signal::<Option<u32>>(None);
    let (target_presenter, set_target_presenter) = signal::<Option<u32>>(None);
    let (errors, set_errors) = signal(FieldErrors::new());

    let target_presenters = move || {
        let Some(id) = target_meeting.get() else { return Vec::new() };
        candidates.with_value(|all| all.iter().find(|m| m.id == id).map(|m| m.presenters.clone()).unwrap_or_default())
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut errs = FieldErrors::new();
        if presenter_id.get().is_none() {
            errs.add("presenter", "This meeting has no presenter to swap");
        }
        if target_meeting.get().is_none() {
            errs.add("target_meeting", "Pick a meeting to swap with");
        } else if target_presenter.get().is_none() {
            errs.add("target_presenter", "Pick a presenter");
        }
        match (presenter_id.get(), target_meeting.get(), target_presenter.get()) {
            (Some(presenter_id), Some(target_meeting_id), Some(target_presenter_id)) if errs.is_empty() => {
                set_errors.set(FieldErrors::new());
                on_submit.run(SwapPresenterRequest { presenter_id, target_meeting_id, target_presenter_id });
            }
            _ => set_errors.set(errs),
        }
    };

    let title = format!("Swap presenter · {}", meeting.date.format("%Y-%m-%d"));

    view! {
        <Modal title=title on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <label>
                    "Presenter"
                    <select on:change=move |ev| set_presenter_id.set(event_target_value(&ev).parse().ok())>
                        {own_presenters.into_iter().map(|p| {
                            let id = p.id;
                            view! {
                                <option value=id.to_string() selected=move || presenter_id.get() == Some(id)>{p.name}</option>
                            }
                        }).collect_view()}
                    </select>
                </label>
                <FieldError errors=errors field="presenter" />

                <label>
                    "Swap with meeting"
                    <select on:change=move |ev| {
                        set_target_meeting.set(event_target_value(&ev).parse().ok());
                        set_target_presenter.set(None);
                    }>
                        <option value="">"Choose a meeting..."</option>
                        {candidates.with_value(|all| all.iter().map(|m| view! {
                            <option value=m.id.to_string()>{meeting_label(m)}</option>
                        }).collect_view())}
                    </select>
                </label>
                <FieldError errors=errors field="target_meeting" />

                <label>
                    "Their presenter"
                    <select
                        disabled=move || target_meeting.get().is_none()
                        on:change=move |ev| set_target_presenter.set(event_target_value(&ev).parse().ok())
                    >
                        <option value="">"Choose a presenter..."</option>
                        {move || target_presenters().into_iter().map(|p| view! {
                            <option value=p.id.to_string()>{p.name}</option>
                        }).collect_view()}
                    </select>
                </label>
                <FieldError errors=errors field="target_presenter" />

                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error label="Swap" />
            </form>
        </Modal>
    }
}
