pub mod control;
pub mod data_channel;
pub mod network;
pub mod pasv;
pub mod port;
pub mod registry;

pub use network::{Server, ServerBuilder, ServerContext, ServerError};
