use super::continuity::Conversation;
use crate::config::{AssistantConfig, InvocationMode};
use crate::process::{Invocation, render_command_line};
use std::path::Path;
use std::time::Duration;

/// Builds assistant invocations from config plus one prepared turn.
#[derive(Debug, Clone)]
pub struct AssistantCommand {
    config: AssistantConfig,
}

impl AssistantCommand {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    /// Arguments following the program name, in invocation order.
    pub fn arguments(&self, prompt: &str, conversation: &Conversation) -> Vec<String> {
        let mut args = self.config.base_args.clone();
        args.push(self.config.prompt_flag.clone());
        args.push(prompt.to_string());

        match conversation {
            Conversation::Stateless => {}
            Conversation::Start(handle) => {
                args.push(self.config.new_session_flag.clone());
                args.push(handle.clone());
            }
            Conversation::Resume(handle) => {
                args.push(self.config.resume_flag.clone());
                args.push(handle.clone());
            }
        }

        if let Some(format) = &self.config.output_format {
            args.push(self.config.output_format_flag.clone());
            args.push(format.clone());
        }

        args
    }

    pub fn build(
        &self,
        prompt: &str,
        conversation: &Conversation,
        working_dir: &Path,
    ) -> Invocation {
        let args = self.arguments(prompt, conversation);
        let invocation = match self.config.invocation {
            InvocationMode::Direct => Invocation::new(&self.config.program, self.timeout()).args(args),
            InvocationMode::Shell => Invocation::shell(
                render_command_line(&self.config.program, &args),
                self.timeout(),
            ),
        };

        self.config
            .env
            .iter()
            .fold(invocation.working_dir(working_dir), |invocation, (key, value)| {
                invocation.env(key, value)
            })
    }
}
