pub mod error;
pub mod headers;
pub mod macros;

pub mod model {
    pub mod jsonrpc;
    pub mod response;
}
