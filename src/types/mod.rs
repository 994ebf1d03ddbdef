//! Public types for the skvader API.

mod message;
mod reply;
mod request;

pub use message::{Message, Role};
pub use reply::{ChatReply, CluesReply, ErrorReply, FactsReply, HealthReply};
pub use request::{
    ChatRequest, GenerateParams, GenerationRequest, Language, validate_chat, validate_generation,
};
