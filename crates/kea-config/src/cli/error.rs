use kea_config_common::ValidationError;
use kea_config_storage::StorageError;

/// Exit codes following Unix conventions
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CONFLICT: i32 = 3;

/// Convert a storage error to a user-friendly message
pub fn format_storage_error(err: &StorageError) -> String {
    match err {
        StorageError::Validation(e) => format!("Invalid input: {}", e),
        StorageError::NotFound { entity_type, key } => {
            format!("Not found: {} {}", entity_type, key)
        }
        StorageError::DuplicateEntity { entity_type, key } => {
            format!("Already exists: {} {}", entity_type, key)
        }
        StorageError::StorageUnavailable { message, .. } => {
            format!("Database unavailable: {}", message)
        }
        StorageError::InvalidConnectionString(msg) => {
            format!("Invalid database URL: {}", msg)
        }
        other => format!("Storage error: {}", other),
    }
}

/// Get exit code for a storage error
pub fn exit_code_for_storage_error(err: &StorageError) -> i32 {
    match err {
        StorageError::Validation(_) | StorageError::InvalidConnectionString(_) => EXIT_USAGE,
        StorageError::DuplicateEntity { .. } => EXIT_CONFLICT,
        _ => EXIT_ERROR,
    }
}

/// Message and exit code for any error a command returned
pub fn describe(err: &anyhow::Error) -> (String, i32) {
    if let Some(storage) = err.downcast_ref::<StorageError>() {
        (format_storage_error(storage), exit_code_for_storage_error(storage))
    } else if let Some(validation) = err.downcast_ref::<ValidationError>() {
        (format!("Invalid input: {}", validation), EXIT_USAGE)
    } else {
        (format!("Error: {:#}", err), EXIT_ERROR)
    }
}
