//! Directive construction.
//!
//! Everything here is pure: the handlers decide *what* to send and validate slot
//! input, these functions only shape the directive the platform forwards to the
//! gadget.

use purifier_skill_types::Directive;
use purifier_skill_types::directive::{SendDirective, StartEventHandler};
use serde_json::{Value, json};
use std::str::FromStr;

/// Namespace of the custom interface the EV3 gadget declares.
pub const NAMESPACE: &str = "Custom.Mindstorms.Gadget";
/// Name of the single control directive the gadget understands.
pub const NAME_CONTROL: &str = "control";
/// Length of one listening window.
pub const EVENT_HANDLER_TIMEOUT_MS: u64 = 60_000;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;

/// Payloads of the `control` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    AirQuality,
    Temperature { unit: String },
    Speed { speed: u8 },
    Auto { command: String },
}

impl Control {
    pub fn payload(&self) -> Value {
        match self {
            Control::AirQuality => json!({ "type": "airquality" }),
            Control::Temperature { unit } => json!({ "type": "temperature", "unit": unit }),
            Control::Speed { speed } => json!({ "type": "speed", "speed": speed }),
            Control::Auto { command } => json!({ "type": "auto", "command": command }),
        }
    }
}

pub fn build(endpoint_id: &str, namespace: &str, name: &str, payload: Value) -> Directive {
    Directive::SendDirective(SendDirective::new(endpoint_id, namespace, name, payload))
}

/// A `Custom.Mindstorms.Gadget.control` directive for `endpoint_id`.
pub fn control(endpoint_id: &str, control: &Control) -> Directive {
    build(endpoint_id, NAMESPACE, NAME_CONTROL, control.payload())
}

pub fn start_event_handler(token: &str, duration_ms: u64, expiration_payload: Value) -> Directive {
    Directive::StartEventHandler(StartEventHandler::new(token, duration_ms, expiration_payload))
}

pub fn clamp_speed(raw: i64) -> u8 {
    // the clamp keeps the value inside u8 range
    raw.clamp(MIN_SPEED as i64, MAX_SPEED as i64) as u8
}

/// Reads a leading integer the way spoken numbers tend to arrive: surrounding
/// whitespace and trailing garbage ("55.5", "70 percent") are tolerated.
pub fn parse_speed(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Named fan presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    High,
    Medium,
    Low,
    Off,
}

impl Mode {
    pub fn speed(self) -> u8 {
        match self {
            Mode::High => 100,
            Mode::Medium => 60,
            Mode::Low => 25,
            Mode::Off => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::High => "high",
            Mode::Medium => "medium",
            Mode::Low => "low",
            Mode::Off => "off",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fan mode {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Mode::High),
            "medium" => Ok(Mode::Medium),
            "low" => Ok(Mode::Low),
            "off" => Ok(Mode::Off),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}
