use abbr_storage::Session;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// A store session scoped to the current request.
///
/// Acquired before the handler runs and dropped with the handler's
/// arguments, which returns the connection to the pool on every exit path.
pub struct DbSession(pub Session);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.db().session().await?;
        Ok(Self(session))
    }
}
