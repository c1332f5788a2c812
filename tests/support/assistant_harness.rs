#![allow(dead_code)]

use std::path::{Path, PathBuf};

use relaybridge::assistant::AssistantExecutor;
use relaybridge::config::{AssistantConfig, Config, FrontendConfig};
use tempfile::TempDir;

/// Prints every argument on its own line, so replies show exactly what was passed.
pub const ECHO_ARGS: &str = r#"printf '%s\n' "$@""#;

/// Fails while a `fail` marker sits next to the script, echoes arguments otherwise.
pub const FLAKY_ECHO: &str = r#"if [ -f "$(dirname "$0")/fail" ]; then
  echo "assistant unavailable" >&2
  exit 3
fi
printf '%s\n' "$@""#;

/// Records its arguments to `args.txt` next to the script and always replies `ok`.
pub const RECORD_ARGS: &str = r#"printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
echo ok"#;

pub struct Harness {
    pub tmp: TempDir,
    pub script: PathBuf,
    pub config: Config,
}

impl Harness {
    /// A config whose assistant is `sh <script>` with the given body.
    pub fn new(body: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let script = write_script(tmp.path(), "assistant.sh", body);
        let workspace = tmp.path().join("workspace");
        std::fs::create_dir_all(&workspace).unwrap();

        let config = Config {
            data_dir: tmp.path().to_path_buf(),
            config_path: tmp.path().join("config.toml"),
            workspace_dir: Some(workspace.to_string_lossy().into_owned()),
            assistant: AssistantConfig {
                program: "sh".into(),
                base_args: vec![script.to_string_lossy().into_owned()],
                timeout_ms: 10_000,
                ..AssistantConfig::default()
            },
            frontend: FrontendConfig {
                allowed_users: vec!["alice".into(), "bob".into()],
            },
            ..Config::default()
        };

        Self {
            tmp,
            script,
            config,
        }
    }

    pub async fn executor(&self) -> AssistantExecutor {
        AssistantExecutor::from_config(&self.config).await.unwrap()
    }

    /// Arguments of the most recent [`RECORD_ARGS`] run.
    pub fn recorded_args(&self) -> String {
        std::fs::read_to_string(self.tmp.path().join("args.txt")).unwrap()
    }

    pub fn set_failing(&self, failing: bool) {
        let marker = self.tmp.path().join("fail");
        if failing {
            std::fs::write(marker, "").unwrap();
        } else if marker.exists() {
            std::fs::remove_file(marker).unwrap();
        }
    }
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    path
}

/// Reply lines produced by [`ECHO_ARGS`].
pub fn arg_lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}

/// Value that follows `flag` in an echoed argument list.
pub fn value_after<'a>(output: &'a str, flag: &str) -> Option<&'a str> {
    let lines = arg_lines(output);
    lines
        .iter()
        .position(|line| *line == flag)
        .and_then(|idx| lines.get(idx + 1).copied())
}
