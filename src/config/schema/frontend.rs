use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Sender ids allowed to reach the assistant. Empty means nobody.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

impl FrontendConfig {
    pub fn is_allowed(&self, sender: &str) -> bool {
        self.allowed_users.iter().any(|user| user == sender)
    }
}
