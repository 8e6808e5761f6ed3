pub mod error;
pub mod utils;

pub(crate) use error::Error as CrateError;

pub mod client {
    pub mod rest;
}
