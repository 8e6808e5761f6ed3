use serde_json::{json, Value};

use std::future::Future;

use super::client::McpClient;
use crate::{RpcError, ToolResult};

/// The trait definition for a MCP tool exposed by the MCD server.
pub trait ToolT {
    /// Pre-defined tool name, sent as `params.name`.
    const NAME: &'static str;

    /// Tool arguments. Default to `{}`.
    fn arguments() -> Value {
        json!({})
    }

    fn call(client: &McpClient) -> impl Future<Output = Result<ToolResult, RpcError>> + Send {
        client.call(Self::NAME, Self::arguments())
    }
}

/// Generate unit structs implementing [`ToolT`].
#[macro_export]
macro_rules! impl_tool_t {
    ($($(#[$meta:meta])* $name:ident => $tool:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl $crate::request::interface::ToolT for $name {
                const NAME: &'static str = $tool;
            }
        )+
    };
}
