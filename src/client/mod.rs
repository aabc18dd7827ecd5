mod conversation;
mod ollama;

pub use conversation::{Conversation, HONORED_TOOL_CALLS_PER_TURN};
pub use ollama::{ChatEndpoint, EndpointError, OllamaClient};
