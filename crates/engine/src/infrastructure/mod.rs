mod config;
mod matching_service;
mod sinks;
mod telemetry;

pub use config::{CONFIG_ENV_VAR, ConfigError, EngineConfig, LogFormat, SeedOrderConfig};
pub use matching_service::{
    DepthResponse, MatchingCommand, MatchingHandle, MatchingService, ServiceConfig, ServiceState,
    ServiceStats,
};
pub use sinks::{BroadcastSink, ChannelSink, TracingSink};
pub use telemetry::init_tracing;
