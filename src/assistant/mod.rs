pub mod command;
pub mod continuity;
pub mod executor;
pub mod locks;
pub mod response;
pub mod utilities;

pub use command::AssistantCommand;
pub use continuity::{
    ContinuityStrategy, Conversation, ExternalHandle, HistoryReplay, PreparedTurn,
    create_strategy,
};
pub use executor::AssistantExecutor;
pub use locks::TurnLocks;
pub use response::{QueryResult, extract_payload};
pub use utilities::{HostUtilities, MAX_LOG_LINES};
