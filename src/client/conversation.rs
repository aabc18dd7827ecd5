use super::ollama::{ChatEndpoint, EndpointError};
use crate::types::{Message, ToolCallError, ToolDescriptor, ToolSet};

use tracing::{debug, error, warn};

/// Only the first tool call of an assistant turn is honored, even when the
/// model requests several. Changing this changes the transcript shape the
/// server observes.
pub const HONORED_TOOL_CALLS_PER_TURN: usize = 1;

/// Drives one prompt to completion: request, dispatch the requested tool,
/// feed the result back, repeat until the model answers without tools.
pub struct Conversation<'a> {
    endpoint: &'a dyn ChatEndpoint,
    registry: &'a ToolSet,
    model: &'a str,
    advertised: Vec<ToolDescriptor>,
    messages: Vec<Message>,
}

impl<'a> Conversation<'a> {
    /// The advertised descriptor set is fixed here for the whole
    /// conversation.
    pub fn new(
        endpoint: &'a dyn ChatEndpoint,
        registry: &'a ToolSet,
        model: &'a str,
        advertised: Vec<ToolDescriptor>,
    ) -> Self {
        Self {
            endpoint,
            registry,
            model,
            advertised,
            messages: vec![],
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the final assistant content. Tool failures are folded back
    /// into the transcript as conversational content; only endpoint failures
    /// abort the run.
    pub async fn run(&mut self, prompt: &str) -> Result<String, EndpointError> {
        self.messages.push(Message::user(prompt));
        let mut turn = 0usize;

        loop {
            turn += 1;
            debug!(turn, "requesting chat completion");
            let tools = (!self.advertised.is_empty()).then_some(self.advertised.as_slice());
            let reply = self.endpoint.chat(self.model, &self.messages, tools).await?;
            let calls = reply.requested_calls().to_vec();
            self.messages.push(reply);

            let Some(call) = calls.first() else { break };
            if calls.len() > HONORED_TOOL_CALLS_PER_TURN {
                debug!(
                    dropped = calls.len() - HONORED_TOOL_CALLS_PER_TURN,
                    "ignoring surplus tool calls in this turn"
                );
            }

            debug!(tool = %call.function.name, "dispatching tool call");
            let content = match self
                .registry
                .dispatch(&call.function.name, &call.function.arguments)
                .await
            {
                Ok(result) => result,
                Err(failure) => {
                    match &failure {
                        ToolCallError::UnknownTool(name) => {
                            error!(tool = %name, "model requested a tool that was never advertised")
                        }
                        other => warn!(tool = %call.function.name, error = %other, "tool call failed"),
                    }
                    format!("error: {failure}")
                }
            };
            self.messages.push(Message::tool(content));
        }

        Ok(self
            .messages
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default())
    }
}
