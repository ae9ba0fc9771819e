//! Root `Subscription` type.
//!
//! All three company streams read the same broadcast channel and keep only
//! their own event kind. A subscriber that lags behind skips the missed
//! events and continues with the newest ones.

use async_graphql::{Context, Result, Subscription};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};

use super::objects::{CompanyDeleteResponse, CompanyNode};
use crate::state::{AppState, CompanyEvent};

/// Push entry points, served over `/graphql/ws`.
#[derive(Debug, Default)]
pub struct SubscriptionRoot;

/// Turn a broadcast receiver into a stream of the events `select` keeps.
///
/// Ends when the channel closes.
fn company_stream<T>(
    rx: broadcast::Receiver<CompanyEvent>,
    select: fn(CompanyEvent) -> Option<T>,
) -> impl Stream<Item = T> {
    futures::stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(item) = select(event) {
                        return Some((item, rx));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "company subscriber lagged, skipping events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[Subscription]
impl SubscriptionRoot {
    async fn company_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = CompanyNode>> {
        let rx = ctx.data::<AppState>()?.subscribe();
        Ok(company_stream(rx, |event| match event {
            CompanyEvent::Created(company) => Some(CompanyNode(company)),
            _ => None,
        }))
    }

    async fn company_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = CompanyNode>> {
        let rx = ctx.data::<AppState>()?.subscribe();
        Ok(company_stream(rx, |event| match event {
            CompanyEvent::Updated(company) => Some(CompanyNode(company)),
            _ => None,
        }))
    }

    async fn company_deleted(
        &self,
        ctx: &Context<'_>,
    ) -> Result<impl Stream<Item = CompanyDeleteResponse>> {
        let rx = ctx.data::<AppState>()?.subscribe();
        Ok(company_stream(rx, |event| match event {
            CompanyEvent::Deleted(deleted) => Some(CompanyDeleteResponse::from(deleted)),
            _ => None,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::pin::pin;
    use std::task::Poll;
    use std::time::Duration;

    use chrono::Utc;
    use crm_store::DeletedCompany;
    use crm_types::{Company, CompanyId};
    use futures::StreamExt;
    use serde_json::Value;

    use super::*;
    use crate::schema::build_schema;
    use crate::state::BROADCAST_CAPACITY;

    fn company(id: &str, name: &str) -> Company {
        let now = Utc::now();
        Company {
            id: CompanyId::from(id),
            name: String::from(name),
            avatar_url: None,
            business_type: None,
            company_size: None,
            industry: None,
            total_revenue: None,
            sales_owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn next_data(stream: &mut (impl Stream<Item = async_graphql::Response> + Unpin)) -> Value {
        let response = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    #[tokio::test]
    async fn company_created_skips_other_event_kinds() {
        let state = AppState::default();
        let schema = build_schema(state.clone());
        let mut stream = schema.execute_stream("subscription { companyCreated { id name } }");

        // The first poll runs the resolver, which subscribes.
        assert!(matches!(futures::poll!(stream.next()), Poll::Pending));

        state.publish(CompanyEvent::Updated(company("1", "Renamed")));
        state.publish(CompanyEvent::Deleted(DeletedCompany {
            id: CompanyId::from("2"),
            name: String::from("Gone"),
        }));
        state.publish(CompanyEvent::Created(company("3", "Globex")));

        let data = next_data(&mut stream).await;
        assert_eq!(data["companyCreated"]["id"], "3");
        assert_eq!(data["companyCreated"]["name"], "Globex");
    }

    #[tokio::test]
    async fn company_deleted_carries_id_and_name() {
        let state = AppState::default();
        let schema = build_schema(state.clone());
        let mut stream = schema.execute_stream("subscription { companyDeleted { id name } }");
        assert!(matches!(futures::poll!(stream.next()), Poll::Pending));

        state.publish(CompanyEvent::Created(company("4", "Initech")));
        state.publish(CompanyEvent::Deleted(DeletedCompany {
            id: CompanyId::from("4"),
            name: String::from("Initech"),
        }));

        let data = next_data(&mut stream).await;
        assert_eq!(data["companyDeleted"]["id"], "4");
        assert_eq!(data["companyDeleted"]["name"], "Initech");
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_ahead_and_keeps_receiving() {
        let state = AppState::default();
        let rx = state.subscribe();

        let overflow = BROADCAST_CAPACITY.saturating_add(10);
        for i in 0..overflow {
            state.publish(CompanyEvent::Created(company(&i.to_string(), "Burst")));
        }
        state.publish(CompanyEvent::Created(company("latest", "Latest")));

        let mut stream = pin!(company_stream(rx, |event| match event {
            CompanyEvent::Created(c) => Some(c),
            _ => None,
        }));

        // The oldest events fell out of the channel; the stream resumes at
        // the oldest one still buffered.
        let first = stream.next().await.unwrap();
        assert_ne!(first.id.as_str(), "0");

        let mut last = first;
        while last.id.as_str() != "latest" {
            last = tokio::time::timeout(Duration::from_secs(2), stream.next())
                .await
                .unwrap()
                .unwrap();
        }
        assert_eq!(last.name, "Latest");
    }

    #[tokio::test]
    async fn stream_ends_when_the_channel_closes() {
        let (tx, rx) = broadcast::channel::<CompanyEvent>(4);
        drop(tx);
        let mut stream = pin!(company_stream(rx, |event| match event {
            CompanyEvent::Created(c) => Some(c),
            _ => None,
        }));
        assert!(stream.next().await.is_none());
    }
}
