pub mod error;
pub mod model;
pub mod request;
pub mod utils;

pub use error::RpcError;
pub use model::credential::Credential;
pub use model::tool_result::ToolResult;
pub use request::client::McpClient;

pub(crate) mod client {
    pub use lib_rpc_client::client::rest;
    pub use lib_rpc_client::error::Error as TransportError;
}
