use std::fs;
use std::path::PathBuf;

use crate::error::{FormsError, Result};
use crate::model::{FormDefinition, FormItem};
use crate::services::FormService;

/// Form definitions stored as `<id>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct FormDirectory {
    root: PathBuf,
}

impl FormDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    pub fn load(&self, id: &str) -> Result<FormDefinition> {
        let path = self.path_for(id);
        if id.is_empty() || id.contains(['/', '\\']) || !path.exists() {
            return Err(FormsError::UnknownForm(id.to_string()));
        }
        let source = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&source)?)
    }

    pub fn save(&self, form: &FormDefinition) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(form)?;
        fs::write(self.path_for(&form.id), json)?;
        Ok(())
    }
}

impl FormService for FormDirectory {
    fn items(&self, form_id: &str) -> Result<Vec<FormItem>> {
        Ok(self.load(form_id)?.items)
    }
}
