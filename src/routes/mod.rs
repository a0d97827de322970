use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers, Config};
use crate::handlers::{client_config, events, health_check, messages, not_found, relationship_timer};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/:id", delete(events::delete_event))
        .route("/events/buckets", get(events::event_buckets))
        .route("/events/day/:date", get(events::events_on_day))
        .route("/events/month/:year/:month", get(events::month))
        .route("/events/week", get(events::week))
        .route("/events/upcoming", get(events::upcoming))
        .route("/events/stats", get(events::stats))
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/messages/:id", delete(messages::delete_message))
        .route("/messages/days", get(messages::messages_by_day))
        .route("/timer", get(relationship_timer))
        .route("/client-config", get(client_config));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state);

    with_security_headers(router, config.production)
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}
