//! Presenter Avatar Component

use leptos::prelude::*;

use crate::avatar::initials;
use crate::context::AppContext;
use crate::models::Presenter;

/// Initials on the presenter's palette colour
#[component]
pub fn PresenterAvatar(presenter: Presenter, #[prop(optional)] show_name: bool) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let style = format!("background-color: {}", ctx.avatar_color(presenter.id));
    let class = if presenter.is_active { "avatar" } else { "avatar inactive" };

    view! {
        <span class="presenter-chip" title=presenter.name.clone()>
            <span class=class style=style>{initials(&presenter.name)}</span>
            {show_name.then(|| view! { <span class="presenter-name">{presenter.name.clone()}</span> })}
        </span>
    }
}
