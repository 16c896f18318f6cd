use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use stylefilter_store::backup::backup_to;
use stylefilter_store::error::StoreError;
use stylefilter_store::paths;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BackupReport {
    output: String,
    size_bytes: u64,
}

pub fn backup(ctx: &Context<'_>, args: BackupArgs) -> Result<()> {
    let out = match args.out {
        Some(path) => path,
        None => paths::default_backup_path(ctx.style_path, Utc::now()),
    };

    let size = match backup_to(ctx.style_path, &out) {
        Ok(size) => size,
        Err(err @ StoreError::InvalidBackupPath(_)) => {
            return Err(err)
                .with_context(|| format!("backup path matches style document: {}", out.display()));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("backup style document to {}", out.display()));
        }
    };

    if ctx.json {
        let report = BackupReport {
            output: out.display().to_string(),
            size_bytes: size,
        };
        return print_json(&report);
    }

    println!("Backup written to {}", out.display());
    Ok(())
}
