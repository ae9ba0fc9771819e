//! Axum router construction for the CRM API.
//!
//! Assembles the GraphQL, GraphiQL, subscription, and health routes into a
//! single [`Router`] with CORS restricted to the configured origins.

use async_graphql_axum::GraphQLSubscription;
use axum::extract::FromRef;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::schema::{CrmSchema, build_schema};
use crate::state::AppState;

/// State shared by all routes. Handlers extract either half.
#[derive(Clone, FromRef)]
pub struct RouterState {
    /// Store and broadcast channel.
    pub app: AppState,
    /// The executable schema.
    pub schema: CrmSchema,
}

/// Build the complete router.
///
/// - `POST /graphql` -- GraphQL queries and mutations
/// - `GET /graphql` -- GraphiQL explorer
/// - `GET /graphql/ws` -- GraphQL subscriptions over `WebSocket`
/// - `GET /health` -- liveness and collection counts
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let schema = build_schema(state.clone());

    Router::new()
        .route(
            "/graphql",
            get(handlers::graphiql).post(handlers::graphql_handler),
        )
        .route_service("/graphql/ws", GraphQLSubscription::new(schema.clone()))
        .route("/health", get(handlers::health))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(RouterState { app: state, schema })
}

/// CORS for browser clients that send credentials. Unparseable origins are
/// skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
