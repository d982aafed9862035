//! SeaORM -> AppError translation helpers.
//!
//! Services convert `sea_orm::DbErr` through `map_db_err` so that route
//! handlers only ever see `AppError`. Raw driver messages are logged with
//! PII redaction and never reach the wire.

use tracing::{error, warn};

use crate::error::AppError;
use crate::logging::pii::Redacted;

/// Whether the error is a unique-constraint violation. The player upsert
/// uses this to distinguish "lost the insert race" from a real failure.
pub fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed") || msg.contains("2067")
}

/// Translate a `DbErr` into an `AppError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> AppError {
    let error_msg = e.to_string();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return AppError::not_found("Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(raw_error = %Redacted(&error_msg), "Database unavailable");
            return AppError::db_unavailable();
        }
        _ => {}
    }

    if is_unique_violation(&e) {
        warn!(raw_error = %Redacted(&error_msg), "Unique constraint violation");
        return AppError::conflict("Unique constraint violation");
    }

    error!(raw_error = %Redacted(&error_msg), "Unhandled database error");
    AppError::db(error_msg)
}
