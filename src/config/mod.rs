pub mod schema;

pub use crate::session::SessionConfig;
pub use schema::{
    AssistantConfig, Config, ContinuityMode, FrontendConfig, InvocationMode, LoggingConfig,
    UtilitiesConfig,
};
