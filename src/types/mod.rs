mod message;
mod tool;
mod tool_object;
mod toolset;

pub use message::{FunctionCall, FunctionDescriptor, Message, Role, ToolCall, ToolDescriptor};
pub use tool::{Tool, ToolExecutionError};
pub use tool_object::{ToolObject, ValidationError};
pub use toolset::{ToolCallError, ToolSet, ToolSetCreationError};
