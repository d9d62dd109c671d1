pub mod add_row;
pub mod allocate;
pub mod catalog;
pub mod clear;
pub mod edit;
pub mod export;
pub mod extract_periods;
pub mod fill_periods;
pub mod generate;
pub mod init;
pub mod show;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use examforge_core::session::Session;
use examforge_providers::{load_config_from, ExamforgeConfig};

pub const DEFAULT_SESSION: &str = "examforge-session.json";

/// Options shared by every command.
pub struct Globals {
    pub session: PathBuf,
    pub config: Option<PathBuf>,
}

impl Globals {
    pub fn load_config(&self) -> Result<ExamforgeConfig> {
        load_config_from(self.config.as_deref())
    }

    /// Load the session, or start an empty one when the file does not exist.
    pub fn load_session(&self) -> Result<Session> {
        if self.session.exists() {
            Session::load_json(&self.session)
        } else {
            tracing::debug!(path = %self.session.display(), "no session file, starting empty");
            Ok(Session::new())
        }
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        session.save_json(&self.session)
    }
}

/// Read a JSON file into a value.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
