#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod assistant;
pub mod config;
pub mod error;
pub mod frontend;
pub mod observability;
pub mod process;
pub mod session;

pub use assistant::{AssistantExecutor, QueryResult};
pub use config::Config;
pub use error::{RelayError, Result};
pub use session::SessionManager;
