//! Token-keyed session map behind the demo `login` mutation.

use std::collections::HashMap;

use crm_types::UserId;
use uuid::Uuid;

/// Active sessions, keyed by access token.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, UserId>,
}

impl SessionStore {
    /// Open a session for `user_id` and return its access token.
    ///
    /// Tokens look like `token-<userId>-<random>`.
    pub fn open(&mut self, user_id: &UserId) -> String {
        let token = format!("token-{user_id}-{}", Uuid::new_v4().simple());
        self.sessions.insert(token.clone(), user_id.clone());
        token
    }

    /// The user a token belongs to.
    pub fn resolve(&self, token: &str) -> Option<&UserId> {
        self.sessions.get(token)
    }

    /// End a session; returns the user it belonged to.
    pub fn close(&mut self, token: &str) -> Option<UserId> {
        self.sessions.remove(token)
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_login() {
        let mut sessions = SessionStore::default();
        let user = UserId::from("1");
        let a = sessions.open(&user);
        let b = sessions.open(&user);
        assert_ne!(a, b);
        assert!(a.starts_with("token-1-"));
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions.resolve(&a), Some(&user));
    }

    #[test]
    fn closed_session_no_longer_resolves() {
        let mut sessions = SessionStore::default();
        let token = sessions.open(&UserId::from("2"));
        assert_eq!(sessions.close(&token), Some(UserId::from("2")));
        assert!(sessions.resolve(&token).is_none());
        assert!(sessions.close(&token).is_none());
        assert!(sessions.is_empty());
    }
}
