/// Body of the `GET /v1/endpoints` call against the platform's endpoint API.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EndpointList {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// A gadget connected to the device the request came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub endpoint_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<serde_json::Value>,
}

impl Endpoint {
    pub fn new(endpoint_id: &str) -> Self {
        Self {
            endpoint_id: endpoint_id.to_string(),
            friendly_name: None,
            capabilities: Vec::new(),
        }
    }
}

/// `{ "endpointId": ... }` as it appears inside directives and events.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRef {
    pub endpoint_id: String,
}
