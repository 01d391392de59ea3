//! Diagnostics Panel Component
//!
//! Recent log records from the in-memory ring buffer.

use leptos::prelude::*;
use log::Level;
use rolling_logger::LogEntry;

use crate::context::AppContext;

fn level_class(level: Level) -> &'static str {
    match level {
        Level::Error => "log-line error",
        Level::Warn => "log-line warn",
        Level::Info => "log-line info",
        Level::Debug | Level::Trace => "log-line debug",
    }
}

#[component]
pub fn DiagnosticsPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (entries, set_entries) = signal(Vec::<LogEntry>::new());

    let refresh = move || {
        // Newest first
        let mut recent = rolling_logger::recent_entries();
        recent.reverse();
        set_entries.set(recent);
    };
    refresh();

    let clear = move |_| {
        if let Some(logger) = rolling_logger::logger() {
            logger.clear();
        }
        refresh();
    };

    let (base_url, capacity, level) =
        ctx.config.with_value(|c| (c.api_base_url.clone(), c.log_capacity, c.log_level));

    view! {
        <section class="page diagnostics">
            <div class="page-header">
                <h2>"Diagnostics"</h2>
                <div class="page-actions">
                    <button class="btn" on:click=move |_| refresh()>"Refresh"</button>
                    <button class="btn ghost" on:click=clear>"Clear"</button>
                </div>
            </div>
            <dl class="config-summary">
                <dt>"API base"</dt>
                <dd>{if base_url.is_empty() { "(same origin)".to_string() } else { base_url }}</dd>
                <dt>"Log level"</dt>
                <dd>{level.to_string()}</dd>
                <dt>"Buffer"</dt>
                <dd>{move || format!("{} / {} records", entries.with(Vec::len), capacity)}</dd>
            </dl>
            <ul class="log-list">
                {move || entries.get().into_iter().map(|entry| view! {
                    <li class=level_class(entry.level)>{entry.format_line()}</li>
                }).collect_view()}
            </ul>
        </section>
    }
}
