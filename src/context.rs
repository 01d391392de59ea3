//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::avatar::AvatarPalette;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::store::{store_clear, ReferenceStore};

/// App-wide state provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub config: StoredValue<AppConfig>,
    /// Auth token, in memory only - read
    pub token: ReadSignal<Option<String>>,
    /// Auth token - write
    set_token: WriteSignal<Option<String>>,
    /// Trigger to reload lists from backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload lists from backend - write
    set_reload_trigger: WriteSignal<u32>,
    /// Locations, funds and presenters
    pub reference: ReferenceStore,
    /// Avatar colours, stable for the session
    palette: StoredValue<AvatarPalette>,
}

impl AppContext {
    pub fn new(config: AppConfig, reference: ReferenceStore) -> Self {
        let (token, set_token) = signal(None);
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        Self {
            config: StoredValue::new(config),
            token,
            set_token,
            reload_trigger,
            set_reload_trigger,
            reference,
            palette: StoredValue::new(AvatarPalette::new()),
        }
    }

    /// Client carrying the current token
    pub fn client(&self) -> ApiClient {
        let base = self.config.with_value(|c| c.api_base_url.clone());
        ApiClient::new(&base, self.token.get_untracked())
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.with(Option::is_some)
    }

    pub fn sign_in(&self, token: String) {
        log::info!("[AUTH] signed in");
        self.set_token.set(Some(token));
    }

    /// Forget the token and every cached list
    pub fn sign_out(&self) {
        log::info!("[AUTH] signed out");
        self.set_token.set(None);
        store_clear(&self.reference);
        self.palette.update_value(AvatarPalette::clear);
    }

    /// Trigger a reload of lists
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Log an API failure and turn it into a message; 401 signs out
    pub fn handle_error(&self, context: &str, err: &ApiError) -> String {
        match err {
            ApiError::Unauthorized => {
                log::warn!("[AUTH] {}: session expired", context);
                self.sign_out();
            }
            ApiError::Aborted => log::debug!("[API] {}: cancelled", context),
            _ => log::error!("[API] {}: {}", context, err),
        }
        err.to_string()
    }

    pub fn avatar_color(&self, presenter_id: u32) -> &'static str {
        self.palette
            .try_update_value(|p| p.color_for(presenter_id))
            .unwrap_or("#7f8c8d")
    }
}
