pub mod invoker;
pub mod shell;

pub use invoker::{FALLBACK_PATH, Invocation, ProcessInvoker, ProcessOutput, effective_path};
pub use shell::{escape_double_quoted, quote, render_command_line};
