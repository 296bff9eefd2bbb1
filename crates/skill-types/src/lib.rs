//now callers can use the wire types without knowing the module layout
pub mod attributes;
pub mod directive;
pub mod endpoint;
pub mod request;
pub mod response;

//re-export types for easier access
pub use attributes::SessionAttributes;
pub use directive::Directive;
pub use endpoint::{Endpoint, EndpointList};
pub use request::{Request, RequestEnvelope};
pub use response::{OutputSpeech, PlayBehavior, Response, ResponseEnvelope};
