//! Per-browser cart kept in the session.
//!
//! The session plays the part of the browser's local storage: the cart
//! snapshot lives under [`CART_STORAGE_KEY`] and is restored into a
//! [`CartStore`] at the start of each request.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use dropship_cart::{CART_STORAGE_KEY, CartStore, MemoryStorage};
use tower_sessions::Session;

use crate::state::AppState;

/// Extractor giving a handler the requesting browser's cart.
///
/// Handlers mutate the cart through [`SessionCart::store`] and then call
/// [`SessionCart::save`] to write the new snapshot back to the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut cart: SessionCart) -> impl IntoResponse {
///     cart.store.clear_cart();
///     cart.save().await;
/// }
/// ```
pub struct SessionCart {
    pub store: CartStore<MemoryStorage>,
    session: Session,
    loaded: Option<String>,
}

impl SessionCart {
    /// Restore the cart stored in `session`, priced in `currency`.
    pub async fn load(session: Session, currency: dropship_core::CurrencyCode) -> Self {
        let loaded = match session.get::<String>(CART_STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart from session");
                None
            }
        };

        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, loaded.clone());
        Self {
            store: CartStore::restore_in(storage, currency),
            session,
            loaded,
        }
    }

    /// Write the cart snapshot back to the session if it changed.
    ///
    /// Failures are logged; the request still succeeds with the in-memory cart.
    pub async fn save(&self) {
        let current = self.store.storage().get(CART_STORAGE_KEY);
        if current == self.loaded.as_deref() {
            return;
        }

        let result = match current {
            Some(raw) => self.session.insert(CART_STORAGE_KEY, raw).await,
            None => self.session.remove::<String>(CART_STORAGE_KEY).await.map(|_| ()),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write cart to session");
        }
    }
}

impl FromRequestParts<AppState> for SessionCart {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session layer is not configured",
        ))?;

        Ok(Self::load(session, state.currency()).await)
    }
}
