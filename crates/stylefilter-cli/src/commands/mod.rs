use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use stylefilter_config::AppConfig;
use stylefilter_core::OperatorCatalog;
use stylefilter_store::backup::backup_to;
use stylefilter_store::{paths, StyleDocument};
use tracing::debug;

pub mod backup;
pub mod completions;
pub mod filter;
pub mod layers;

pub struct Context<'a> {
    pub style_path: &'a Path,
    pub json: bool,
    pub config: &'a AppConfig,
    pub catalog: &'a OperatorCatalog,
}

impl Context<'_> {
    pub fn load(&self) -> Result<StyleDocument> {
        StyleDocument::open(self.style_path)
            .with_context(|| format!("open style document {}", self.style_path.display()))
    }

    pub fn commit(&self, doc: &StyleDocument) -> Result<()> {
        if self.config.output.backup_on_write {
            let out = paths::default_backup_path(self.style_path, Utc::now());
            backup_to(self.style_path, &out)
                .with_context(|| format!("backup style document to {}", out.display()))?;
            debug!(path = %out.display(), "style document backed up");
        }
        doc.save(self.style_path, self.config.output.indent)
            .with_context(|| format!("write style document {}", self.style_path.display()))
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
