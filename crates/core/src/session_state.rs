use crate::directives::{self, EVENT_HANDLER_TIMEOUT_MS};
use purifier_skill_types::{Directive, Endpoint, SessionAttributes};
use serde_json::json;

/// Number of listening windows a session may run through before it closes.
pub const SESSION_DURATION_TICKS: u32 = 10;

/// The event channel currently registered with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListeningWindow {
    /// Gadget chosen at launch; never changes for the rest of the session.
    pub endpoint_id: String,
    /// Windows left, including the one currently running.
    pub duration: u32,
    /// Token of the registered event handler.
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Listening(ListeningWindow),
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LaunchOutcome {
    /// A gadget was found; the directive registers the first listening window.
    Listening { directive: Directive },
    NoGadget,
}

/// Why an inbound gadget event or expiration was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotListening,
    TokenMismatch,
    EndpointMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpirationOutcome {
    /// A new window was opened under a fresh token.
    Renewed { remaining: u32, directive: Directive },
    /// The last window ran out; the session is over.
    Expired,
    Ignored(Rejection),
}

/// The bounded listening session.
///
/// A session listens for gadget events one window at a time. Each window is
/// registered under its own token; when it expires the controller counts down,
/// rotates the token and registers the next one. Events are only applied when
/// they carry the token and endpoint of the current window, which keeps a
/// late event from an earlier window (or another gadget) out of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self {
            state: SessionState::Inactive,
        }
    }

    /// Rebuilds the session from persisted attributes. Anything short of an
    /// endpoint and a token is treated as no session at all.
    pub fn from_attributes(attributes: &SessionAttributes) -> Self {
        match (&attributes.endpoint_id, &attributes.token) {
            (Some(endpoint_id), Some(token)) => Self {
                state: SessionState::Listening(ListeningWindow {
                    endpoint_id: endpoint_id.clone(),
                    duration: attributes.duration.unwrap_or(0),
                    token: token.clone(),
                }),
            },
            _ => Self::new(),
        }
    }

    pub fn to_attributes(&self) -> SessionAttributes {
        match &self.state {
            SessionState::Listening(window) => SessionAttributes {
                endpoint_id: Some(window.endpoint_id.clone()),
                duration: Some(window.duration),
                token: Some(window.token.clone()),
            },
            SessionState::Inactive | SessionState::Ended => SessionAttributes::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn window(&self) -> Option<&ListeningWindow> {
        match &self.state {
            SessionState::Listening(window) => Some(window),
            _ => None,
        }
    }

    pub fn endpoint_id(&self) -> Option<&str> {
        self.window().map(|w| w.endpoint_id.as_str())
    }

    pub fn duration(&self) -> Option<u32> {
        self.window().map(|w| w.duration)
    }

    pub fn token(&self) -> Option<&str> {
        self.window().map(|w| w.token.as_str())
    }

    pub fn is_ended(&self) -> bool {
        self.state == SessionState::Ended
    }

    /// Opens the first listening window on the first connected gadget.
    pub fn launch(&mut self, endpoints: &[Endpoint], token: &str) -> LaunchOutcome {
        let Some(endpoint) = endpoints.first() else {
            tracing::info!("No gadget connected, ending session");
            self.state = SessionState::Ended;
            return LaunchOutcome::NoGadget;
        };

        tracing::info!(
            "Listening on endpoint {} ({}) for {} windows",
            endpoint.endpoint_id,
            endpoint.friendly_name.as_deref().unwrap_or("unnamed"),
            SESSION_DURATION_TICKS
        );
        self.state = SessionState::Listening(ListeningWindow {
            endpoint_id: endpoint.endpoint_id.clone(),
            duration: SESSION_DURATION_TICKS,
            token: token.to_string(),
        });

        LaunchOutcome::Listening {
            directive: directives::start_event_handler(token, EVENT_HANDLER_TIMEOUT_MS, json!({})),
        }
    }

    /// Checks that a gadget event belongs to the current window. Accepting an
    /// event changes nothing: the running window keeps its token and deadline.
    pub fn accept(&self, token: &str, endpoint_id: &str) -> Result<(), Rejection> {
        let window = self.window().ok_or(Rejection::NotListening)?;
        if window.token != token {
            return Err(Rejection::TokenMismatch);
        }
        if window.endpoint_id != endpoint_id {
            return Err(Rejection::EndpointMismatch);
        }
        Ok(())
    }

    /// Handles the platform's notice that the window registered under
    /// `expired_token` ran out. Each expiration uses up one tick; the window
    /// that brings the count to zero closes the session.
    pub fn expire(&mut self, expired_token: &str, new_token: &str) -> ExpirationOutcome {
        let SessionState::Listening(window) = &mut self.state else {
            return ExpirationOutcome::Ignored(Rejection::NotListening);
        };
        if window.token != expired_token {
            return ExpirationOutcome::Ignored(Rejection::TokenMismatch);
        }

        let remaining = window.duration.saturating_sub(1);
        if remaining == 0 {
            tracing::info!("Session duration used up, ending session");
            self.state = SessionState::Ended;
            return ExpirationOutcome::Expired;
        }

        window.duration = remaining;
        window.token = new_token.to_string();
        tracing::info!("Renewed listening window, {} remaining", remaining);

        ExpirationOutcome::Renewed {
            remaining,
            directive: directives::start_event_handler(
                new_token,
                EVENT_HANDLER_TIMEOUT_MS,
                json!({}),
            ),
        }
    }

    pub fn end(&mut self) {
        self.state = SessionState::Ended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listening_session() -> SessionLifecycle {
        let mut session = SessionLifecycle::new();
        session.launch(&[Endpoint::new("endpoint-1")], "token-0");
        session
    }

    #[test]
    fn launch_with_gadget_starts_listening() {
        let mut session = SessionLifecycle::new();
        let outcome = session.launch(
            &[Endpoint::new("endpoint-1"), Endpoint::new("endpoint-2")],
            "token-0",
        );

        assert_eq!(session.endpoint_id(), Some("endpoint-1"));
        assert_eq!(session.duration(), Some(10));
        assert_eq!(session.token(), Some("token-0"));

        let LaunchOutcome::Listening { directive: Directive::StartEventHandler(handler) } = outcome
        else {
            panic!("expected a start event handler directive");
        };
        assert_eq!(handler.token(), "token-0");
        assert_eq!(handler.duration_ms(), 60000);
        assert_eq!(handler.expiration_payload(), &json!({}));
    }

    #[test]
    fn launch_without_gadget_ends_session() {
        let mut session = SessionLifecycle::new();
        assert_eq!(session.launch(&[], "token-0"), LaunchOutcome::NoGadget);
        assert!(session.is_ended());
        assert!(session.to_attributes().is_empty());
    }

    #[test]
    fn accept_requires_matching_token_and_endpoint() {
        let session = listening_session();

        assert_eq!(session.accept("token-0", "endpoint-1"), Ok(()));
        assert_eq!(
            session.accept("stale-token", "endpoint-1"),
            Err(Rejection::TokenMismatch)
        );
        assert_eq!(
            session.accept("token-0", "endpoint-2"),
            Err(Rejection::EndpointMismatch)
        );
        assert_eq!(
            SessionLifecycle::new().accept("token-0", "endpoint-1"),
            Err(Rejection::NotListening)
        );
    }

    #[test]
    fn rejected_events_leave_state_untouched() {
        let session = listening_session();
        let before = session.clone();

        for token in ["", "token-1", "TOKEN-0", "token-0 "] {
            assert!(session.accept(token, "endpoint-1").is_err());
        }
        assert_eq!(session, before);
    }

    #[test]
    fn expiration_rotates_token_and_counts_down() {
        let mut session = listening_session();

        let outcome = session.expire("token-0", "token-1");
        let ExpirationOutcome::Renewed { remaining, directive } = outcome else {
            panic!("expected renewal");
        };
        assert_eq!(remaining, 9);
        assert_eq!(session.duration(), Some(9));
        assert_eq!(session.token(), Some("token-1"));
        assert!(matches!(
            directive,
            Directive::StartEventHandler(ref handler) if handler.token() == "token-1" && handler.duration_ms() == 60000
        ));

        // events for the superseded window no longer match
        assert_eq!(
            session.accept("token-0", "endpoint-1"),
            Err(Rejection::TokenMismatch)
        );
        assert_eq!(session.accept("token-1", "endpoint-1"), Ok(()));
    }

    #[test]
    fn ten_expirations_end_the_session() {
        let mut session = listening_session();
        let mut previous = session.duration().unwrap();
        let mut zero_seen = 0;

        for i in 1..=10 {
            let outcome = session.expire(&format!("token-{}", i - 1), &format!("token-{i}"));
            match outcome {
                ExpirationOutcome::Renewed { remaining, .. } => {
                    assert!(i < 10, "session should end on the tenth expiration");
                    assert!(remaining < previous);
                    previous = remaining;
                }
                ExpirationOutcome::Expired => {
                    assert_eq!(i, 10);
                    zero_seen += 1;
                }
                ExpirationOutcome::Ignored(rejection) => panic!("unexpected rejection {rejection:?}"),
            }
        }

        assert_eq!(zero_seen, 1);
        assert!(session.is_ended());
        assert_eq!(
            session.expire("token-10", "token-11"),
            ExpirationOutcome::Ignored(Rejection::NotListening)
        );
    }

    #[test]
    fn stale_expiration_is_ignored() {
        let mut session = listening_session();
        session.expire("token-0", "token-1");

        assert_eq!(
            session.expire("token-0", "token-2"),
            ExpirationOutcome::Ignored(Rejection::TokenMismatch)
        );
        assert_eq!(session.duration(), Some(9));
        assert_eq!(session.token(), Some("token-1"));
    }

    #[test]
    fn persisted_zero_duration_expires_immediately() {
        let mut session = SessionLifecycle::from_attributes(&SessionAttributes {
            endpoint_id: Some("endpoint-1".into()),
            duration: Some(0),
            token: Some("token-0".into()),
        });

        assert_eq!(session.expire("token-0", "token-1"), ExpirationOutcome::Expired);
    }

    #[test]
    fn attributes_round_trip_through_listening_state() {
        let session = listening_session();
        let attributes = session.to_attributes();

        assert_eq!(attributes.endpoint_id.as_deref(), Some("endpoint-1"));
        assert_eq!(attributes.duration, Some(10));
        assert_eq!(attributes.token.as_deref(), Some("token-0"));
        assert_eq!(SessionLifecycle::from_attributes(&attributes), session);
    }

    #[test]
    fn partial_attributes_mean_no_session() {
        let session = SessionLifecycle::from_attributes(&SessionAttributes {
            endpoint_id: Some("endpoint-1".into()),
            duration: Some(4),
            token: None,
        });
        assert_eq!(session.state(), &SessionState::Inactive);
    }
}
