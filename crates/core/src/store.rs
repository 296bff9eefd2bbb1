use crate::session_state::SessionLifecycle;
use purifier_skill_types::SessionAttributes;

/// Per-invocation view of the session attributes.
///
/// Handlers work on the lifecycle loaded here. Nothing reaches the platform
/// until `commit`, which only runs after a handler returned successfully;
/// an error path hands back the attributes exactly as they arrived.
#[derive(Debug)]
pub struct SessionStore {
    received: SessionAttributes,
    loaded: SessionLifecycle,
    lifecycle: SessionLifecycle,
}

impl SessionStore {
    pub fn load(received: SessionAttributes) -> Self {
        let loaded = SessionLifecycle::from_attributes(&received);
        Self {
            received,
            lifecycle: loaded.clone(),
            loaded,
        }
    }

    pub fn lifecycle_mut(&mut self) -> &mut SessionLifecycle {
        &mut self.lifecycle
    }

    /// Attributes to persist after a successful handler run. An untouched
    /// session is written back verbatim.
    pub fn commit(self) -> SessionAttributes {
        if self.lifecycle == self.loaded {
            self.received
        } else {
            self.lifecycle.to_attributes()
        }
    }

    /// Attributes to persist when the handler failed.
    pub fn rollback(self) -> SessionAttributes {
        self.received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purifier_skill_types::Endpoint;

    fn listening_attributes() -> SessionAttributes {
        SessionAttributes {
            endpoint_id: Some("endpoint-1".into()),
            duration: Some(5),
            token: Some("token-0".into()),
        }
    }

    #[test]
    fn untouched_session_commits_received_attributes() {
        let received = SessionAttributes {
            endpoint_id: Some("endpoint-1".into()),
            duration: None,
            token: None,
        };
        let store = SessionStore::load(received.clone());
        assert_eq!(store.commit(), received);
    }

    #[test]
    fn modified_session_commits_new_attributes() {
        let mut store = SessionStore::load(listening_attributes());
        store.lifecycle_mut().expire("token-0", "token-1");

        let committed = store.commit();
        assert_eq!(committed.duration, Some(4));
        assert_eq!(committed.token.as_deref(), Some("token-1"));
    }

    #[test]
    fn rollback_discards_changes() {
        let mut store = SessionStore::load(SessionAttributes::default());
        store
            .lifecycle_mut()
            .launch(&[Endpoint::new("endpoint-9")], "token-9");

        assert_eq!(store.rollback(), SessionAttributes::default());
    }

    #[test]
    fn ended_session_clears_attributes() {
        let mut store = SessionStore::load(listening_attributes());
        store.lifecycle_mut().end();
        assert!(store.commit().is_empty());
    }
}
