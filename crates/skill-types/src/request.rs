use crate::attributes::SessionAttributes;
use crate::endpoint::EndpointRef;
use std::collections::HashMap;

/// The JSON document the voice platform posts for every invocation.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,

    /// Absent for requests that are not part of a session (e.g. some
    /// `CustomInterfaceController` deliveries in older API versions).
    #[serde(default)]
    pub session: Option<Session>,

    pub context: Context,

    pub request: Request,
}

impl RequestEnvelope {
    /// The attributes the previous response stored, or empty ones for a new session.
    pub fn attributes(&self) -> SessionAttributes {
        self.session
            .as_ref()
            .and_then(|s| s.attributes.clone())
            .unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.session_id.as_str())
    }

    pub fn is_new_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.new)
    }

    /// The skill's application id, taken from the session or the system context.
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.application.as_ref())
            .or(self.context.system.application.as_ref())
            .map(|a| a.application_id.as_str())
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub attributes: Option<SessionAttributes>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemContext,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub api_endpoint: String,

    #[serde(default)]
    pub api_access_token: Option<String>,

    #[serde(default)]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    #[serde(rename = "CustomInterfaceController.EventsReceived")]
    EventsReceived(EventsReceivedRequest),
    #[serde(rename = "CustomInterfaceController.Expired")]
    Expired(ExpiredRequest),
    SessionEndedRequest(SessionEndedRequest),
    /// Any request type this skill does not declare an interface for.
    #[serde(other)]
    Unknown,
}

impl Request {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Request::LaunchRequest(r) => Some(&r.request_id),
            Request::IntentRequest(r) => Some(&r.request_id),
            Request::EventsReceived(r) => Some(&r.request_id),
            Request::Expired(r) => Some(&r.request_id),
            Request::SessionEndedRequest(r) => Some(&r.request_id),
            Request::Unknown => None,
        }
    }

    /// The request type as the platform names it, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::LaunchRequest(_) => "LaunchRequest",
            Request::IntentRequest(_) => "IntentRequest",
            Request::EventsReceived(_) => "CustomInterfaceController.EventsReceived",
            Request::Expired(_) => "CustomInterfaceController.Expired",
            Request::SessionEndedRequest(_) => "SessionEndedRequest",
            Request::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value of the named slot, `None` when the slot is missing or blank.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// `CustomInterfaceController.EventsReceived`
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsReceivedRequest {
    pub request_id: String,
    /// Token of the event handler the events were delivered to.
    pub token: String,
    #[serde(default)]
    pub events: Vec<CustomEvent>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct CustomEvent {
    pub header: EventHeader,
    pub endpoint: EndpointRef,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct EventHeader {
    pub namespace: String,
    pub name: String,
}

/// `CustomInterfaceController.Expired`
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredRequest {
    pub request_id: String,
    /// Token of the event handler that expired.
    pub token: String,
    #[serde(default)]
    pub expiration_payload: serde_json::Value,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_launch_request_for_new_session() {
        let envelope: RequestEnvelope = serde_json::from_str(
            r#"{
                "version": "1.0",
                "session": {
                    "new": true,
                    "sessionId": "amzn1.echo-api.session.1",
                    "application": { "applicationId": "amzn1.ask.skill.purifier" }
                },
                "context": {
                    "System": {
                        "apiEndpoint": "https://api.amazonalexa.com",
                        "apiAccessToken": "secret-token",
                        "application": { "applicationId": "amzn1.ask.skill.purifier" }
                    }
                },
                "request": {
                    "type": "LaunchRequest",
                    "requestId": "amzn1.echo-api.request.1",
                    "timestamp": "2019-11-01T00:00:00Z",
                    "locale": "en-US"
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(envelope.request, Request::LaunchRequest(_)));
        assert_eq!(envelope.request.request_id(), Some("amzn1.echo-api.request.1"));
        assert_eq!(envelope.session_id(), Some("amzn1.echo-api.session.1"));
        assert!(envelope.is_new_session());
        assert_eq!(envelope.application_id(), Some("amzn1.ask.skill.purifier"));
        assert!(envelope.attributes().is_empty());
    }

    #[test]
    fn intent_slot_values_ignore_blank_entries() {
        let request: Request = serde_json::from_str(
            r#"{
                "type": "IntentRequest",
                "requestId": "r-2",
                "intent": {
                    "name": "SetModeIntent",
                    "confirmationStatus": "NONE",
                    "slots": {
                        "Mode": { "name": "Mode", "value": " high " },
                        "Empty": { "name": "Empty", "value": "   " },
                        "Unset": { "name": "Unset" }
                    }
                }
            }"#,
        )
        .unwrap();

        let Request::IntentRequest(intent_request) = request else {
            panic!("expected an intent request");
        };
        let intent = intent_request.intent;
        assert_eq!(intent.slot_value("Mode"), Some("high"));
        assert_eq!(intent.slot_value("Empty"), None);
        assert_eq!(intent.slot_value("Unset"), None);
        assert_eq!(intent.slot_value("Missing"), None);
    }

    #[test]
    fn parses_events_received() {
        let request: Request = serde_json::from_str(
            r#"{
                "type": "CustomInterfaceController.EventsReceived",
                "requestId": "r-3",
                "token": "token-1",
                "events": [
                    {
                        "header": { "namespace": "Custom.Mindstorms.Gadget", "name": "AirQuality" },
                        "endpoint": { "endpointId": "amzn1.ask.endpoint.EV3" },
                        "payload": { "request": 1, "speech": "Would you like high mode?" }
                    }
                ]
            }"#,
        )
        .unwrap();

        let Request::EventsReceived(events) = request else {
            panic!("expected events");
        };
        assert_eq!(events.token, "token-1");
        assert_eq!(events.events[0].header.name, "AirQuality");
        assert_eq!(events.events[0].endpoint.endpoint_id, "amzn1.ask.endpoint.EV3");
        assert_eq!(events.events[0].payload["request"], 1);
    }

    #[test]
    fn unknown_request_types_do_not_fail_parsing() {
        let request: Request = serde_json::from_str(
            r#"{ "type": "AudioPlayer.PlaybackStarted", "requestId": "r-4" }"#,
        )
        .unwrap();

        assert!(matches!(request, Request::Unknown));
        assert_eq!(request.request_id(), None);
    }
}
