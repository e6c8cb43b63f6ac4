// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Cross-cutting concerns
pub mod error;

// Re-export main types for convenience
pub use application::SharedMatchingCore;
pub use error::{EngineError, Result};
pub use infrastructure::{
    BroadcastSink, CONFIG_ENV_VAR, ChannelSink, ConfigError, DepthResponse, EngineConfig,
    LogFormat, MatchingHandle, MatchingService, SeedOrderConfig, ServiceConfig, ServiceState,
    ServiceStats, TracingSink, init_tracing,
};

pub use limitbook_core::{MatchEvent, Order, OrderId, Price, Quantity, Side, Trade};
pub use limitbook_matching::{BookSnapshot, MatchingCore, PriceLevel, SubmitReport};
