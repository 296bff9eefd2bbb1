use crate::attributes::SessionAttributes;
use crate::directive::Directive;

pub const RESPONSE_VERSION: &str = "1.0";

/// The JSON document returned to the voice platform.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,

    #[serde(default)]
    pub session_attributes: SessionAttributes,

    pub response: Response,
}

impl ResponseEnvelope {
    pub fn new(session_attributes: SessionAttributes, response: Response) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes,
            response,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    /// Left out entirely when the skill has no opinion, which lets an active
    /// event handler keep the session alive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml {
        ssml: String,
        #[serde(
            rename = "playBehavior",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        play_behavior: Option<PlayBehavior>,
    },
}

impl OutputSpeech {
    pub fn ssml(&self) -> &str {
        match self {
            OutputSpeech::Ssml { ssml, .. } => ssml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    Enqueue,
    ReplaceAll,
    ReplaceEnqueued,
}
