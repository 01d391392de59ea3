//! Login Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::AppContext;
use crate::error::ApiError;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let user = username.get().trim().to_string();
        let pass = password.get();
        if user.is_empty() || pass.is_empty() {
            set_error.set(Some("Enter your username and password".into()));
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        let client = ctx.client();
        spawn_local(async move {
            match api::login(&client, &user, &pass).await {
                Ok(token) => {
                    set_password.set(String::new());
                    ctx.sign_in(token);
                }
                Err(err) => {
                    log::warn!("[AUTH] login failed: {}", err);
                    let message = match err {
                        ApiError::Http { status: 400, .. } | ApiError::Unauthorized => {
                            "Invalid username or password".to_string()
                        }
                        other => other.to_string(),
                    };
                    set_error.set(Some(message));
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=submit>
                <h1>"LabDash"</h1>
                <label>
                    "Username"
                    <input
                        type="text"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|msg| view! { <p class="field-error">{msg}</p> })}
                <button type="submit" class="btn primary" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
