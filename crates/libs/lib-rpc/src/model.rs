pub mod credential;
pub mod tool_result;
