//! Session repository trait definition.

use chrono::{DateTime, Utc};
use snapvote_types::error::RepositoryError;
use snapvote_types::id::SessionId;
use snapvote_types::session::Session;

pub trait SessionRepository: Send + Sync {
    fn create(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Session, RepositoryError>> + Send;

    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove every session that expired before `now`. Returns the number removed.
    fn delete_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
