use anyhow::Error;
use std::process::ExitCode;
use stylefilter_config::ConfigError;
use stylefilter_core::operators::UnknownCombiningOp;
use stylefilter_core::{ArgumentError, CatalogError, FilterError};
use stylefilter_store::error::{StoreError, StoreErrorKind};
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_UNSUPPORTED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported filter shape: {0}")]
    Unsupported(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn unsupported(message: impl Into<String>) -> Error {
    CliError::Unsupported(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::Unsupported(_) => EXIT_UNSUPPORTED,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(filter_err) = cause.downcast_ref::<FilterError>() {
            return ExitCode::from(filter_exit_code(filter_err));
        }
        if cause.downcast_ref::<ArgumentError>().is_some()
            || cause.downcast_ref::<CatalogError>().is_some()
            || cause.downcast_ref::<UnknownCombiningOp>().is_some()
        {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::MissingStylePath
        | StoreErrorKind::InvalidStylePath
        | StoreErrorKind::InvalidDocument
        | StoreErrorKind::DuplicateLayerId
        | StoreErrorKind::InvalidBackupPath
        | StoreErrorKind::Json => EXIT_INVALID_INPUT,
        StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidSeparator(_)
        | ConfigError::InvalidIndent(_)
        | ConfigError::EmptyPath { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn filter_exit_code(err: &FilterError) -> u8 {
    match err {
        FilterError::NestedCombining { .. } => EXIT_UNSUPPORTED,
        FilterError::Malformed(_)
        | FilterError::ClauseIndexOutOfRange { .. }
        | FilterError::CombiningOperatorInClause(_)
        | FilterError::UnknownOperator(_)
        | FilterError::ArityMismatch { .. } => EXIT_INVALID_INPUT,
    }
}
