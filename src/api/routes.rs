use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Reads, scoped by parent id where applicable
        .route("/getkbs", get(handlers::list_knowledge_bases::<S>))
        .route("/getkb/:id", get(handlers::get_knowledge_base::<S>))
        .route("/getrules/:idkb", get(handlers::list_rules::<S>))
        .route("/getrule/:id", get(handlers::get_rule::<S>))
        .route("/getpattern/:idr", get(handlers::get_pattern_by_rule::<S>))
        .route("/getparameters/:idpat", get(handlers::list_parameters::<S>))
        .route("/getparameter/:id", get(handlers::get_parameter::<S>))
        // Updates
        .route("/updatekb", put(handlers::rename_knowledge_base::<S>))
        .route("/updaterule", put(handlers::rename_rule::<S>))
        .route("/updatepattern", put(handlers::rename_pattern::<S>))
        .route("/updateparameters", put(handlers::update_parameters::<S>))
        .layer(CorsLayer::permissive())
}

/// Router with the store attached, ready to serve.
pub fn app<S: Store + 'static>(store: Arc<S>) -> Router {
    create_router::<S>().with_state(store)
}
