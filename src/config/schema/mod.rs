mod assistant;
mod core;
mod frontend;
mod observability;
mod utilities;

pub use assistant::{AssistantConfig, ContinuityMode, InvocationMode};
pub use core::Config;
pub use frontend::FrontendConfig;
pub use observability::LoggingConfig;
pub use utilities::UtilitiesConfig;
