/// Session attributes persisted by the voice platform between invocations.
///
/// The platform echoes whatever the previous response stored under
/// `sessionAttributes` back in `session.attributes`, so every field is optional:
/// a brand new session arrives with none of them set.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttributes {
    /// The gadget endpoint picked at launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,

    /// Remaining listening intervals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    /// Token of the currently registered event handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionAttributes {
    pub fn is_empty(&self) -> bool {
        self.endpoint_id.is_none() && self.duration.is_none() && self.token.is_none()
    }
}
