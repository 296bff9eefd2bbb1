use crate::Reply;
use crate::gadget_directory::{DeviceContext, GadgetDirectory};
use crate::handlers;
use crate::store::SessionStore;
use anyhow::{Context, Result};
use purifier_skill_types::request::{EventsReceivedRequest, ExpiredRequest, Intent};
use purifier_skill_types::{Request, RequestEnvelope, ResponseEnvelope};
use std::sync::Arc;

/// Every inbound request, reduced to the handler that owns it.
///
/// Variants are listed in dispatch priority. `Unsupported` is the catch-all
/// and must stay last.
#[derive(Debug)]
pub enum SkillEvent<'a> {
    Launch { request_id: &'a str },
    AirQuality,
    Temperature(&'a Intent),
    SetSpeed(&'a Intent),
    SetMode(&'a Intent),
    Auto(&'a Intent),
    YesNo(&'a Intent),
    CustomEvents(&'a EventsReceivedRequest),
    Expiration(&'a ExpiredRequest),
    Help,
    CancelOrStop,
    SessionEnded { reason: Option<&'a str> },
    /// An intent no dedicated handler claims.
    Reflect { intent_name: &'a str },
    Unsupported { request_type: &'a str },
}

impl<'a> SkillEvent<'a> {
    pub fn classify(request: &'a Request) -> Self {
        match request {
            Request::LaunchRequest(launch) => SkillEvent::Launch {
                request_id: &launch.request_id,
            },
            Request::IntentRequest(intent_request) => {
                let intent = &intent_request.intent;
                match intent.name.as_str() {
                    "AirQualityIntent" => SkillEvent::AirQuality,
                    "TemperatureIntent" => SkillEvent::Temperature(intent),
                    "SetSpeedIntent" => SkillEvent::SetSpeed(intent),
                    "SetModeIntent" => SkillEvent::SetMode(intent),
                    "AutoIntent" => SkillEvent::Auto(intent),
                    "YesNoIntent" => SkillEvent::YesNo(intent),
                    "AMAZON.HelpIntent" => SkillEvent::Help,
                    "AMAZON.CancelIntent" | "AMAZON.StopIntent" => SkillEvent::CancelOrStop,
                    name => SkillEvent::Reflect { intent_name: name },
                }
            }
            Request::EventsReceived(events) => SkillEvent::CustomEvents(events),
            Request::Expired(expired) => SkillEvent::Expiration(expired),
            Request::SessionEndedRequest(ended) => SkillEvent::SessionEnded {
                reason: ended.reason.as_deref(),
            },
            Request::Unknown => SkillEvent::Unsupported {
                request_type: request.kind(),
            },
        }
    }
}

/// The skill: routes request envelopes to handlers and builds the responses.
pub struct Skill {
    directory: Arc<dyn GadgetDirectory>,
}

impl Skill {
    pub fn new(directory: Arc<dyn GadgetDirectory>) -> Self {
        Self { directory }
    }

    /// Handles one envelope. Failures are answered with a spoken apology and
    /// leave the session attributes as they were received.
    pub async fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        tracing::debug!(
            "Request type: {} (session {}{})",
            envelope.request.kind(),
            envelope.session_id().unwrap_or("-"),
            if envelope.is_new_session() { ", new" } else { "" }
        );

        let mut store = SessionStore::load(envelope.attributes());
        match self.dispatch(envelope, &mut store).await {
            Ok(reply) => ResponseEnvelope::new(store.commit(), reply.into_response()),
            Err(e) => {
                tracing::error!("Error handling {}: {:?}", envelope.request.kind(), e);
                ResponseEnvelope::new(store.rollback(), handlers::apology().into_response())
            }
        }
    }

    async fn dispatch(&self, envelope: &RequestEnvelope, store: &mut SessionStore) -> Result<Reply> {
        let session = store.lifecycle_mut();

        let reply = match SkillEvent::classify(&envelope.request) {
            SkillEvent::Launch { request_id } => {
                let context = DeviceContext::from_envelope(envelope)?;
                let endpoints = self
                    .directory
                    .connected_endpoints(&context)
                    .await
                    .context("Failed to look up connected gadgets")?;
                handlers::launch(session, &endpoints, request_id)
            }
            SkillEvent::AirQuality => handlers::air_quality(session),
            SkillEvent::Temperature(intent) => handlers::temperature(session, intent),
            SkillEvent::SetSpeed(intent) => handlers::set_speed(session, intent),
            SkillEvent::SetMode(intent) => handlers::set_mode(session, intent),
            SkillEvent::Auto(intent) => handlers::auto(session, intent),
            SkillEvent::YesNo(intent) => handlers::yes_no(session, intent),
            SkillEvent::CustomEvents(events) => handlers::custom_events(session, events),
            SkillEvent::Expiration(expired) => handlers::expiration(session, expired),
            SkillEvent::Help => handlers::help(),
            SkillEvent::CancelOrStop => handlers::cancel_or_stop(session),
            SkillEvent::SessionEnded { reason } => handlers::session_ended(session, reason),
            SkillEvent::Reflect { intent_name } => handlers::reflect(intent_name),
            SkillEvent::Unsupported { request_type } => {
                tracing::warn!("No handler for request type {}", request_type);
                handlers::apology()
            }
        };

        Ok(reply)
    }
}
