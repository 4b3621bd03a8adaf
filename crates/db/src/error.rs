use propdesk_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules.
///
/// Plain CRUD methods return `sqlx::Error` directly; engine operations can
/// additionally fail with a [`CoreError`] (missing row, invalid transition,
/// already-closed cycle), in which case their transaction is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
