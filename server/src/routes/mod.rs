use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthLayer, TokenVerifier};
use crate::handlers::{
    create_event, delete_event, filter_events, get_all_events, get_event_by_id, health_check,
    update_event,
};
use crate::models::EVENTS_COLLECTION;
use crate::store::{Collection, DocumentStore};

/// Dependencies shared by every handler. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }

    pub fn events(&self) -> Collection {
        Collection::new(Arc::clone(&self.store), EVENTS_COLLECTION)
    }

    pub fn verifier(&self) -> Arc<dyn TokenVerifier> {
        Arc::clone(&self.verifier)
    }
}

pub fn create_routes(state: AppState) -> Router {
    let auth = AuthLayer::new(state.verifier());

    Router::new()
        .route("/health", get(health_check))
        // Operations answer every method; input location decides the payload.
        .route("/createEvent", any(create_event).layer(auth.clone()))
        .route("/getAllEvents", any(get_all_events))
        .route("/getEventById", any(get_event_by_id).layer(auth.clone()))
        .route("/updateEvent", any(update_event).layer(auth.clone()))
        .route("/deleteEvent", any(delete_event).layer(auth))
        .route("/filterEvents", any(filter_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
