//! Navigation Bar Component
//!
//! Page tabs plus sign-out.

use leptos::prelude::*;

use crate::app::Page;
use crate::context::AppContext;

#[component]
pub fn NavBar(page: ReadSignal<Page>, set_page: WriteSignal<Page>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <nav class="nav-bar">
            <span class="nav-title">"LabDash"</span>
            <div class="nav-tabs">
                {Page::ALL.into_iter().map(|p| view! {
                    <button
                        class=move || if page.get() == p { "nav-tab active" } else { "nav-tab" }
                        on:click=move |_| set_page.set(p)
                    >
                        {p.label()}
                    </button>
                }).collect_view()}
            </div>
            <button class="btn ghost" on:click=move |_| ctx.sign_out()>"Sign out"</button>
        </nav>
    }
}
