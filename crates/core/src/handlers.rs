//! One function per event kind. Each reads the session, maybe changes it, and
//! returns the `Reply` for the platform. Slot validation lives here; the
//! directive builder trusts what it is given.

use crate::Reply;
use crate::directives::{self, Control, Mode, NAMESPACE};
use crate::session_state::{ExpirationOutcome, LaunchOutcome, SessionLifecycle};
use crate::speech::Speech;
use purifier_skill_types::Endpoint;
use purifier_skill_types::request::{EventsReceivedRequest, ExpiredRequest, Intent};
use serde_json::Value;

pub const WELCOME_MESSAGE: &str =
    "Welcome to air purifier, built out of LEGO EV3, how can I help you?";
pub const NO_GADGET_MESSAGE: &str = "I couldnt find an EV3 Brick connected to this Echo device. Please check to make sure your EV3 Brick is connected, and try again.";
pub const NO_SESSION_MESSAGE: &str =
    "The air purifier is not connected yet. Open air purifier first, then ask again.";
pub const EXPIRED_MESSAGE: &str = "Skill duration expired. Goodbye.";
pub const REPROMPT_MESSAGE: &str = "Can you repeat that?";
pub const HELP_MESSAGE: &str = "You can ask me to check the air quality or the temperature, set the fan speed, or switch auto mode on or off. How can I help?";
pub const GOODBYE_MESSAGE: &str = "Goodbye!";
pub const APOLOGY_MESSAGE: &str = "Sorry, I had trouble doing what you asked. Please try again.";

pub const SLOT_UNIT: &str = "Unit";
pub const SLOT_SPEED: &str = "Speed";
pub const SLOT_MODE: &str = "Mode";
pub const SLOT_ON_OFF: &str = "OnOff";
pub const SLOT_YES_NO: &str = "YesNo";

const DEFAULT_UNIT: &str = "celsius";

/// A required slot that the NLU layer left empty or filled with something
/// this skill cannot act on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("slot {0} is empty")]
    Missing(&'static str),
    #[error("slot {slot} has unrecognized value {value:?}")]
    Unrecognized { slot: &'static str, value: String },
}

fn required_slot<'a>(intent: &'a Intent, slot: &'static str) -> Result<&'a str, SlotError> {
    intent.slot_value(slot).ok_or(SlotError::Missing(slot))
}

// Turns a slot failure into the re-prompt; the session stays open.
fn recover(result: Result<Reply, SlotError>) -> Reply {
    result.unwrap_or_else(|e| {
        tracing::debug!("Re-prompting: {}", e);
        reprompt()
    })
}

// Sends `control` to the session's gadget, or explains that there is none.
fn control_reply(session: &SessionLifecycle, control: Control, speech: String) -> Reply {
    match session.endpoint_id() {
        Some(endpoint_id) => Reply::speak(Speech::ambient(speech))
            .with_directive(directives::control(endpoint_id, &control)),
        None => no_session(),
    }
}

pub fn launch(session: &mut SessionLifecycle, endpoints: &[Endpoint], token: &str) -> Reply {
    match session.launch(endpoints, token) {
        LaunchOutcome::Listening { directive } => {
            Reply::speak(Speech::ambient(WELCOME_MESSAGE)).with_directive(directive)
        }
        LaunchOutcome::NoGadget => Reply::speak(Speech::plain(NO_GADGET_MESSAGE)).end(),
    }
}

pub fn air_quality(session: &SessionLifecycle) -> Reply {
    control_reply(session, Control::AirQuality, "Checking air quality".to_string())
}

pub fn temperature(session: &SessionLifecycle, intent: &Intent) -> Reply {
    let unit = intent.slot_value(SLOT_UNIT).unwrap_or(DEFAULT_UNIT);
    control_reply(
        session,
        Control::Temperature {
            unit: unit.to_string(),
        },
        format!("Checking air temperature in {unit}"),
    )
}

pub fn set_speed(session: &SessionLifecycle, intent: &Intent) -> Reply {
    recover(try_set_speed(session, intent))
}

fn try_set_speed(session: &SessionLifecycle, intent: &Intent) -> Result<Reply, SlotError> {
    let raw = required_slot(intent, SLOT_SPEED)?;
    let speed = directives::parse_speed(raw)
        .map(directives::clamp_speed)
        .ok_or_else(|| SlotError::Unrecognized {
            slot: SLOT_SPEED,
            value: raw.to_string(),
        })?;

    Ok(control_reply(
        session,
        Control::Speed { speed },
        format!("purifier speed set to {speed} percent."),
    ))
}

pub fn set_mode(session: &SessionLifecycle, intent: &Intent) -> Reply {
    recover(try_set_mode(session, intent))
}

fn try_set_mode(session: &SessionLifecycle, intent: &Intent) -> Result<Reply, SlotError> {
    let raw = required_slot(intent, SLOT_MODE)?;
    let mode = raw.parse::<Mode>().map_err(|e| SlotError::Unrecognized {
        slot: SLOT_MODE,
        value: e.0,
    })?;

    Ok(control_reply(
        session,
        Control::Speed { speed: mode.speed() },
        format!("Setting air purifier to {}", mode.as_str()),
    ))
}

pub fn auto(session: &SessionLifecycle, intent: &Intent) -> Reply {
    recover(required_slot(intent, SLOT_ON_OFF).map(|command| {
        control_reply(
            session,
            Control::Auto {
                command: command.to_string(),
            },
            format!("Turning auto mode {command}"),
        )
    }))
}

/// Answer to the gadget's "set the purifier to high mode?" question.
pub fn yes_no(session: &SessionLifecycle, intent: &Intent) -> Reply {
    recover(required_slot(intent, SLOT_YES_NO).map(|answer| {
        if answer.to_lowercase().contains("yes") {
            control_reply(
                session,
                Control::Speed {
                    speed: Mode::High.speed(),
                },
                "Setting air purifier to high mode".to_string(),
            )
        } else {
            Reply::speak(Speech::ambient(
                "Ok, you can ask me to set the speed anytime.",
            ))
        }
    }))
}

/// Custom events the gadget sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GadgetEvent {
    AirQuality,
    FanSpeed,
    Filter,
    Temperature,
    Other(String),
}

impl GadgetEvent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "AirQuality" => GadgetEvent::AirQuality,
            "FanSpeed" => GadgetEvent::FanSpeed,
            "Filter" => GadgetEvent::Filter,
            "Temperature" => GadgetEvent::Temperature,
            other => GadgetEvent::Other(other.to_string()),
        }
    }

    /// What to say when the event payload carries no `speech`.
    pub fn default_speech(&self) -> &'static str {
        match self {
            GadgetEvent::AirQuality => "The air quality reading has been updated.",
            GadgetEvent::FanSpeed => "The fan speed has changed.",
            GadgetEvent::Filter => "Please check the air filter.",
            GadgetEvent::Temperature => "The temperature reading has been updated.",
            GadgetEvent::Other(_) => "The air purifier sent an update.",
        }
    }
}

// The gadget sends `request: 1` when its speech ends in a question.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

pub fn custom_events(session: &SessionLifecycle, request: &EventsReceivedRequest) -> Reply {
    let Some(event) = request.events.first() else {
        tracing::debug!("EventsReceived request carried no events");
        return Reply::silent();
    };

    if event.header.namespace != NAMESPACE {
        tracing::warn!(
            "Event namespace {} is not ours. Ignoring this event",
            event.header.namespace
        );
        return Reply::silent();
    }

    if let Err(rejection) = session.accept(&request.token, &event.endpoint.endpoint_id) {
        tracing::warn!("Ignoring custom event {}: {:?}", event.header.name, rejection);
        return Reply::silent();
    }

    tracing::info!("Received custom event {}", event.header.name);
    let kind = GadgetEvent::from_name(&event.header.name);
    let speech = event
        .payload
        .get("speech")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(kind.default_speech());

    let reply = Reply::speak(Speech::ambient(speech)).replace_all();
    let asks_question = event.payload.get("request").is_some_and(is_truthy);
    if kind == GadgetEvent::AirQuality && asks_question {
        reply.keep_open()
    } else {
        reply
    }
}

pub fn expiration(session: &mut SessionLifecycle, request: &ExpiredRequest) -> Reply {
    match session.expire(&request.token, &request.request_id) {
        ExpirationOutcome::Renewed {
            remaining,
            directive,
        } => Reply::speak(Speech::ambient(format!("{remaining} minutes remaining.")))
            .with_directive(directive),
        ExpirationOutcome::Expired => Reply::speak(Speech::plain(EXPIRED_MESSAGE)).end(),
        ExpirationOutcome::Ignored(rejection) => {
            tracing::warn!("Ignoring expiration: {:?}", rejection);
            Reply::silent()
        }
    }
}

pub fn help() -> Reply {
    Reply::speak(Speech::plain(HELP_MESSAGE)).with_reprompt(Speech::plain(HELP_MESSAGE))
}

pub fn cancel_or_stop(session: &mut SessionLifecycle) -> Reply {
    session.end();
    Reply::speak(Speech::plain(GOODBYE_MESSAGE)).end()
}

pub fn session_ended(session: &mut SessionLifecycle, reason: Option<&str>) -> Reply {
    tracing::info!("Session ended: {}", reason.unwrap_or("unknown reason"));
    session.end();
    Reply::silent()
}

/// Catch-all for intents the interaction model declares but no handler owns.
pub fn reflect(intent_name: &str) -> Reply {
    Reply::speak(Speech::plain(format!("You just triggered {intent_name}")))
}

pub fn reprompt() -> Reply {
    Reply::speak(Speech::plain(REPROMPT_MESSAGE)).keep_open()
}

pub fn no_session() -> Reply {
    Reply::speak(Speech::plain(NO_SESSION_MESSAGE)).end()
}

pub fn apology() -> Reply {
    Reply::speak(Speech::plain(APOLOGY_MESSAGE)).with_reprompt(Speech::plain(APOLOGY_MESSAGE))
}
