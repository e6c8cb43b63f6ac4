mod command;
mod service;

pub use command::{DepthResponse, MatchingCommand, ServiceStats};
pub use service::{MatchingHandle, MatchingService, ServiceConfig, ServiceState};
