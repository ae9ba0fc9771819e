//! HTTP request handlers.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::{Html, IntoResponse};

use crate::schema::{CrmSchema, SessionToken};
use crate::state::AppState;

/// `POST /graphql`: execute a query or mutation.
///
/// A `Bearer` token in the `Authorization` header is passed to resolvers
/// as [`SessionToken`] request data.
pub async fn graphql_handler(
    State(schema): State<CrmSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(SessionToken::from_header)
    {
        request = request.data(token);
    }
    schema.execute(request).await.into()
}

/// `GET /graphql`: the GraphiQL explorer.
pub async fn graphiql() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/graphql/ws")
            .finish(),
    )
}

/// `GET /health`: liveness plus per-collection counts.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let counts = state.store.read().await.counts();
    Json(serde_json::json!({
        "status": "ok",
        "collections": counts,
    }))
}
