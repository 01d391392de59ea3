//! Reference Data Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Filled once
//! after sign-in and read by the forms.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::{self, ApiClient};
use crate::error::ApiError;
use crate::models::{Fund, Location, Presenter};

/// Lookup lists shared by every form
#[derive(Clone, Debug, Default, Store)]
pub struct ReferenceData {
    pub locations: Vec<Location>,
    pub funds: Vec<Fund>,
    /// Active and inactive presenters, for assignee pickers
    pub presenters: Vec<Presenter>,
    pub loaded: bool,
}

/// Type alias for the store
pub type ReferenceStore = Store<ReferenceData>;

// ========================
// Store Helper Functions
// ========================

/// Fetch all reference lists; a failed list is logged and left empty
pub async fn load_reference_data(store: ReferenceStore, client: ApiClient) -> Result<(), ApiError> {
    let locations = api::list_locations(&client).await;
    let funds = api::list_funds(&client).await;
    let presenters = api::list_presenters(&client).await;

    // 401 means the session is gone; report it instead of a half-loaded store
    for result in [locations.as_ref().err(), funds.as_ref().err(), presenters.as_ref().err()].into_iter().flatten() {
        if *result == ApiError::Unauthorized {
            return Err(ApiError::Unauthorized);
        }
        log::warn!("[STORE] reference list failed: {}", result);
    }

    store.locations().set(locations.unwrap_or_default());
    store.funds().set(funds.unwrap_or_default());
    store.presenters().set(presenters.unwrap_or_default());
    store.loaded().set(true);
    log::info!(
        "[STORE] loaded {} locations, {} funds, {} presenters",
        store.locations().with_untracked(Vec::len),
        store.funds().with_untracked(Vec::len),
        store.presenters().with_untracked(Vec::len)
    );
    Ok(())
}

/// Drop everything (sign-out)
pub fn store_clear(store: &ReferenceStore) {
    *store.write() = ReferenceData::default();
}

/// Presenters that can still be assigned
pub fn active_presenters(store: &ReferenceStore) -> Vec<Presenter> {
    store.presenters().with(|all| all.iter().filter(|p| p.is_active).cloned().collect())
}
