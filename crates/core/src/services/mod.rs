//! Service implementations.

pub mod block;
pub mod comment;
pub mod follow;
pub mod like;
pub mod mailer;
pub mod notification;
pub mod post;
pub mod report;
pub mod user;
pub mod visibility;

use socialhub_common::{AppError, AppResult};

/// Recover a unique-key Conflict from a toggle's create branch.
///
/// `Ok(Some(row))` is a fresh insert. `Ok(None)` means a concurrent request
/// already created the row, which toggles report as success. Anything else
/// propagates.
pub(crate) fn recover_conflict<T>(result: AppResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::Conflict(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
