use std::{io::ErrorKind, path::PathBuf};

use common::templates::Template;
use tokio::fs;
use tracing::{error, warn};

use crate::{constants::TEMPLATE_FILE_PREFIX, errors::StorageError, file_store::read_json};

/// Read-only quote templates shipped as `template-*.json` files
pub struct TemplateLibrary {
    dir: PathBuf,
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn list(&self) -> Result<Vec<Template>, StorageError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("Templates directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut templates: Vec<Template> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_template = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with(TEMPLATE_FILE_PREFIX) && name.ends_with(".json")
                });

            if !is_template {
                continue;
            }

            match read_json::<Template>(&path).await {
                Ok(Some(template)) => templates.push(template),
                Ok(None) => {}
                Err(err) => error!("Failed to load template {}: {err}", path.display()),
            }
        }

        templates.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(templates)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Template>, StorageError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|template| template.id == id))
    }
}
