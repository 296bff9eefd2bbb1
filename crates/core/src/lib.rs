pub mod directives;
pub mod gadget_directory;
pub mod handlers;
pub mod router;
pub mod session_state;
pub mod speech;
pub mod store;

pub use router::{Skill, SkillEvent};

use purifier_skill_types::Directive;
use purifier_skill_types::response::{PlayBehavior, Reprompt, Response};
use speech::Speech;

/// What a handler decided to do with one inbound event.
///
/// Handlers never talk to the platform directly; they return a `Reply` and the
/// router turns it into the response envelope. A `Reply::silent()` produces an
/// empty response, which is how ignored events are answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub speech: Option<Speech>,
    pub reprompt: Option<Speech>,
    pub directives: Vec<Directive>,
    pub play_behavior: Option<PlayBehavior>,
    /// `None` leaves the decision to the platform.
    pub end_session: Option<bool>,
}

impl Reply {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn speak(speech: Speech) -> Self {
        Self {
            speech: Some(speech),
            ..Self::default()
        }
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_reprompt(mut self, reprompt: Speech) -> Self {
        self.reprompt = Some(reprompt);
        self
    }

    /// Interrupts whatever the device is currently saying.
    pub fn replace_all(mut self) -> Self {
        self.play_behavior = Some(PlayBehavior::ReplaceAll);
        self
    }

    pub fn keep_open(mut self) -> Self {
        self.end_session = Some(false);
        self
    }

    pub fn end(mut self) -> Self {
        self.end_session = Some(true);
        self
    }

    pub fn is_silent(&self) -> bool {
        self.speech.is_none() && self.reprompt.is_none() && self.directives.is_empty()
    }

    pub fn into_response(self) -> Response {
        Response {
            output_speech: self
                .speech
                .as_ref()
                .map(|s| speech::output_speech(s, self.play_behavior)),
            reprompt: self.reprompt.as_ref().map(|s| Reprompt {
                output_speech: speech::output_speech(s, None),
            }),
            directives: self.directives,
            should_end_session: self.end_session,
        }
    }
}
