use crate::endpoint::EndpointRef;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "CustomInterfaceController.SendDirective")]
    SendDirective(SendDirective),
    #[serde(rename = "CustomInterfaceController.StartEventHandler")]
    StartEventHandler(StartEventHandler),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DirectiveHeader {
    pub namespace: String,
    pub name: String,
}

/// `CustomInterfaceController.SendDirective`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SendDirective {
    header: DirectiveHeader,
    endpoint: EndpointRef,

    /// Opaque to the platform, decoded by the gadget
    payload: serde_json::Value,
}

impl SendDirective {
    pub fn new(endpoint_id: &str, namespace: &str, name: &str, payload: serde_json::Value) -> Self {
        Self {
            header: DirectiveHeader {
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            endpoint: EndpointRef {
                endpoint_id: endpoint_id.to_string(),
            },
            payload,
        }
    }

    pub fn header(&self) -> &DirectiveHeader {
        &self.header
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint.endpoint_id
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}

/// `CustomInterfaceController.StartEventHandler`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StartEventHandler {
    token: String,
    expiration: Expiration,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    pub duration_in_milliseconds: u64,

    /// Handed back verbatim in the `Expired` request
    pub expiration_payload: serde_json::Value,
}

impl StartEventHandler {
    pub fn new(token: &str, duration_ms: u64, expiration_payload: serde_json::Value) -> Self {
        Self {
            token: token.to_string(),
            expiration: Expiration {
                duration_in_milliseconds: duration_ms,
                expiration_payload,
            },
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn duration_ms(&self) -> u64 {
        self.expiration.duration_in_milliseconds
    }

    pub fn expiration_payload(&self) -> &serde_json::Value {
        &self.expiration.expiration_payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn send_directive_wire_shape() {
        let directive = Directive::SendDirective(SendDirective::new(
            "amzn1.ask.endpoint.EV3",
            "Custom.Mindstorms.Gadget",
            "control",
            json!({ "type": "speed", "speed": 60 }),
        ));

        assert_eq!(
            serde_json::to_value(&directive).unwrap(),
            json!({
                "type": "CustomInterfaceController.SendDirective",
                "header": { "namespace": "Custom.Mindstorms.Gadget", "name": "control" },
                "endpoint": { "endpointId": "amzn1.ask.endpoint.EV3" },
                "payload": { "type": "speed", "speed": 60 }
            })
        );
    }

    #[test]
    fn start_event_handler_wire_shape() {
        let directive =
            Directive::StartEventHandler(StartEventHandler::new("token-1", 60000, json!({})));

        assert_eq!(
            serde_json::to_value(&directive).unwrap(),
            json!({
                "type": "CustomInterfaceController.StartEventHandler",
                "token": "token-1",
                "expiration": {
                    "durationInMilliseconds": 60000,
                    "expirationPayload": {}
                }
            })
        );
    }
}
