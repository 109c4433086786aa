use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::model::Email;
use crate::services::MailService;

/// Spools each outgoing email as a JSON file for a relay to pick up.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
}

impl OutboxMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Messages currently waiting in the outbox, oldest first.
    pub fn pending(&self) -> Result<Vec<Email>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        let mut emails = Vec::with_capacity(paths.len());
        for path in &paths {
            let source = fs::read_to_string(path)?;
            emails.push(serde_json::from_str(&source)?);
        }
        Ok(emails)
    }
}

impl MailService for OutboxMailer {
    fn send(&mut self, email: &Email) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file_name = format!(
            "{}-{}.json",
            Utc::now().format("%Y%m%dT%H%M%S%.6f"),
            Uuid::new_v4()
        );
        let path = self.dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(email)?)?;
        info!(to = %email.to, path = %path.display(), "email queued");
        Ok(())
    }
}
