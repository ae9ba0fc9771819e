//! Shared application state for the CRM server.
//!
//! [`AppState`] holds the store behind a read-write lock and the
//! broadcast channel that feeds the company subscriptions. Resolvers reach
//! it through the GraphQL context data.

use std::sync::Arc;

use crm_store::{CrmStore, DeletedCompany};
use crm_types::Company;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for company change events.
///
/// A subscriber that falls behind by more than this many messages receives
/// [`broadcast::error::RecvError::Lagged`] and skips ahead.
pub(crate) const BROADCAST_CAPACITY: usize = 256;

/// A change to the company collection, pushed to subscribers.
#[derive(Debug, Clone)]
pub enum CompanyEvent {
    /// `createOneCompany` inserted a company.
    Created(Company),
    /// `updateOneCompany` modified a company.
    Updated(Company),
    /// `deleteOneCompany` removed a company.
    Deleted(DeletedCompany),
}

/// Shared state for the GraphQL schema and the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-memory CRM data.
    pub store: Arc<RwLock<CrmStore>>,
    /// Broadcast sender for company change events.
    pub tx: broadcast::Sender<CompanyEvent>,
}

impl AppState {
    /// Wrap a loaded store.
    pub fn new(store: CrmStore) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(store)),
            tx,
        }
    }

    /// Subscribe to company change events.
    pub fn subscribe(&self) -> broadcast::Receiver<CompanyEvent> {
        self.tx.subscribe()
    }

    /// Publish a company change to all subscribers.
    ///
    /// Returns the number of receivers that got the event, 0 when nobody is
    /// subscribed (this is not an error).
    pub fn publish(&self, event: CompanyEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CrmStore::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use crm_types::CompanyId;

    use super::*;

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let state = AppState::default();
        let sent = state.publish(CompanyEvent::Deleted(DeletedCompany {
            id: CompanyId::from("1"),
            name: String::from("Gone"),
        }));
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let state = AppState::default();
        let mut rx = state.subscribe();
        let sent = state.publish(CompanyEvent::Deleted(DeletedCompany {
            id: CompanyId::from("3"),
            name: String::from("Initech"),
        }));
        assert_eq!(sent, 1);

        match rx.recv().await.unwrap() {
            CompanyEvent::Deleted(deleted) => assert_eq!(deleted.name, "Initech"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
