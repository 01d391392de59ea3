//! LabDash App
//!
//! Root component: login gate, navigation and the active page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::{DiagnosticsPanel, InventoryPage, LoginForm, MeetingsPage, NavBar, RequestsPage, TasksPage};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::store::{load_reference_data, ReferenceData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Inventory,
    Requests,
    Meetings,
    Tasks,
    Diagnostics,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Inventory, Page::Requests, Page::Meetings, Page::Tasks, Page::Diagnostics];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Inventory => "Inventory",
            Page::Requests => "Requests",
            Page::Meetings => "Meetings",
            Page::Tasks => "Tasks",
            Page::Diagnostics => "Diagnostics",
        }
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let reference = Store::new(ReferenceData::default());
    let ctx = AppContext::new(config, reference);
    provide_context(ctx);

    let (page, set_page) = signal(Page::default());

    // Reference data follows the session
    Effect::new(move |_| {
        if ctx.token.get().is_none() {
            set_page.set(Page::default());
            return;
        }
        let client = ctx.client();
        spawn_local(async move {
            if let Err(err) = load_reference_data(reference, client).await {
                ctx.handle_error("load reference data", &err);
            }
        });
    });

    view! {
        <Show when=move || ctx.is_signed_in() fallback=|| view! { <LoginForm /> }>
            <div class="app-layout">
                <NavBar page=page set_page=set_page />
                <main class="app-main">
                    {move || match page.get() {
                        Page::Inventory => view! { <InventoryPage /> }.into_any(),
                        Page::Requests => view! { <RequestsPage /> }.into_any(),
                        Page::Meetings => view! { <MeetingsPage /> }.into_any(),
                        Page::Tasks => view! { <TasksPage /> }.into_any(),
                        Page::Diagnostics => view! { <DiagnosticsPanel /> }.into_any(),
                    }}
                </main>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_labels_unique() {
        let mut labels: Vec<&str> = Page::ALL.iter().map(Page::label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Page::ALL.len());
        assert_eq!(Page::default(), Page::Inventory);
    }
}
