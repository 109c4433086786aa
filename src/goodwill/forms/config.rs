use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FormsError, Result};
use crate::model::Answer;

/// Number of columns in an xlsx worksheet.
pub const MAX_COLUMNS: usize = 16_384;

/// Router settings, read from a JSON file with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Spreadsheet collecting every submission.
    pub master_sheet_id: String,
    /// Reference sheet with `Location`, `Spreadsheet ID` and `Short Name`.
    pub member_mappings_sheet_id: String,
    /// Form whose items are echoed in confirmation emails.
    pub form_id: String,
    #[serde(default)]
    pub fields: FieldNames,
    /// Column of the program id in a submitted row. Only consulted when the
    /// master header has no column titled [`FieldNames::program_id`].
    #[serde(default = "default_program_id_column")]
    pub program_id_column: usize,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub messages: MessageConfig,
    #[serde(default)]
    pub self_test: SelfTestConfig,
}

/// Known-good fixtures the smoke runner compares against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfTestConfig {
    #[serde(default)]
    pub mapping_fixture: Option<MappingFixture>,
    #[serde(default)]
    pub email_fixture: Option<EmailFixture>,
}

/// A small mapping-style sheet and the records it must convert to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingFixture {
    pub sheet_id: String,
    pub records: Vec<BTreeMap<String, String>>,
}

/// A test form, answers to it, and the exact body they must render to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailFixture {
    pub form_id: String,
    pub responses: BTreeMap<String, Answer>,
    pub expected_body: String,
}

/// Question titles the router reads from a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNames {
    #[serde(default = "default_member_field")]
    pub member: String,
    /// Older deployments of the form titled the member question differently.
    #[serde(default = "default_member_aliases")]
    pub member_aliases: Vec<String>,
    #[serde(default = "default_email_field")]
    pub email: String,
    #[serde(default = "default_program_id_field")]
    pub program_id: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            member: default_member_field(),
            member_aliases: default_member_aliases(),
            email: default_email_field(),
            program_id: default_program_id_field(),
        }
    }
}

impl FieldNames {
    /// Member field first, then its aliases.
    pub fn member_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.member.as_str()).chain(self.member_aliases.iter().map(String::as_str))
    }
}

/// Directories used by the local backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default = "default_spreadsheets_dir")]
    pub spreadsheets_dir: PathBuf,
    #[serde(default = "default_forms_dir")]
    pub forms_dir: PathBuf,
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            spreadsheets_dir: default_spreadsheets_dir(),
            forms_dir: default_forms_dir(),
            outbox_dir: default_outbox_dir(),
        }
    }
}

impl StorageConfig {
    fn resolve_against(&mut self, base: &Path) {
        for dir in [
            &mut self.spreadsheets_dir,
            &mut self.forms_dir,
            &mut self.outbox_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageConfig {
    #[serde(default = "default_success_subject")]
    pub success_subject: String,
    #[serde(default = "default_failure_subject")]
    pub failure_subject: String,
    #[serde(default = "default_no_reply")]
    pub no_reply: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            success_subject: default_success_subject(),
            failure_subject: default_failure_subject(),
            no_reply: default_no_reply(),
        }
    }
}

impl RouterConfig {
    /// Builds a configuration with default field names, storage and messages.
    pub fn new(
        master_sheet_id: impl Into<String>,
        member_mappings_sheet_id: impl Into<String>,
        form_id: impl Into<String>,
    ) -> Self {
        Self {
            master_sheet_id: master_sheet_id.into(),
            member_mappings_sheet_id: member_mappings_sheet_id.into(),
            form_id: form_id.into(),
            fields: FieldNames::default(),
            program_id_column: default_program_id_column(),
            storage: StorageConfig::default(),
            messages: MessageConfig::default(),
            self_test: SelfTestConfig::default(),
        }
    }

    /// Reads and validates a configuration file. Relative storage paths are
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FormsError::MissingInput(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        let mut config: RouterConfig = serde_json::from_str(&source)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.storage.resolve_against(base);
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("masterSheetId", &self.master_sheet_id),
            ("memberMappingsSheetId", &self.member_mappings_sheet_id),
            ("formId", &self.form_id),
            ("fields.member", &self.fields.member),
            ("fields.email", &self.fields.email),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(FormsError::InvalidConfig(format!("'{key}' must not be empty")));
            }
        }
        if self.program_id_column >= MAX_COLUMNS {
            return Err(FormsError::InvalidConfig(format!(
                "'programIdColumn' must be below {MAX_COLUMNS}, got {}",
                self.program_id_column
            )));
        }
        Ok(())
    }
}

fn default_member_field() -> String {
    "Goodwill Member Name".to_string()
}

fn default_member_aliases() -> Vec<String> {
    vec!["Goodwill Member ID".to_string()]
}

fn default_email_field() -> String {
    "Your email address".to_string()
}

fn default_program_id_field() -> String {
    "Program ID".to_string()
}

fn default_program_id_column() -> usize {
    7
}

fn default_spreadsheets_dir() -> PathBuf {
    PathBuf::from("spreadsheets")
}

fn default_forms_dir() -> PathBuf {
    PathBuf::from("forms")
}

fn default_outbox_dir() -> PathBuf {
    PathBuf::from("outbox")
}

fn default_success_subject() -> String {
    "Thank you for submitting the Goodwill Programs Data form!".to_string()
}

fn default_failure_subject() -> String {
    "There has been a problem with your form submission".to_string()
}

fn default_no_reply() -> bool {
    true
}
