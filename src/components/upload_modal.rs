//! Upload Materials Modal

use leptos::prelude::*;
use web_sys::File;

use crate::components::form_actions::FormActions;
use crate::components::modal::Modal;
use crate::models::GroupMeeting;
use crate::validation::validate_upload_size;

/// Attach slides or papers to a meeting (50 MB limit)
#[component]
pub fn UploadModal(
    meeting: GroupMeeting,
    #[prop(into)] on_submit: Callback<File>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] submit_error: Signal<Option<String>>,
    #[prop(into)] submitting: Signal<bool>,
) -> impl IntoView {
    let file = StoredValue::new_local(None::<File>);
    let (file_label, set_file_label) = signal::<Option<String>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    let on_file = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let picked = input.files().and_then(|files| files.get(0));
        set_error.set(None);
        match picked {
            Some(f) => match validate_upload_size(f.size()) {
                Ok(()) => {
                    set_file_label.set(Some(format!("{} ({:.1} MB)", f.name(), f.size() / (1024.0 * 1024.0))));
                    file.set_value(Some(f));
                }
                Err(msg) => {
                    set_error.set(Some(msg));
                    set_file_label.set(None);
                    file.set_value(None);
                    input.set_value("");
                }
            },
            None => {
                set_file_label.set(None);
                file.set_value(None);
            }
        }
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match file.try_get_value().flatten() {
            Some(f) => on_submit.run(f),
            None => set_error.set(Some("Choose a file to upload".into())),
        }
    };

    view! {
        <Modal title=format!("Upload materials · {}", meeting.display_title()) on_close=on_close>
            <form class="modal-form" on:submit=submit>
                {(!meeting.materials.is_empty()).then(|| view! {
                    <ul class="materials">
                        {meeting.materials.iter().map(|m| view! {
                            <li><a href=m.url.clone() target="_blank" rel="noopener">{m.name.clone()}</a></li>
                        }).collect_view()}
                    </ul>
                })}
                <input type="file" on:change=on_file />
                {move || file_label.get().map(|label| view! { <p class="file-name">{label}</p> })}
                {move || error.get().map(|msg| view! { <p class="field-error">{msg}</p> })}
                <FormActions on_cancel=on_close submitting=submitting submit_error=submit_error label="Upload" />
            </form>
        </Modal>
    }
}
