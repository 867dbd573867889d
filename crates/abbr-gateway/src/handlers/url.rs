use abbr_core::{expiry, ShortName, UrlRecord};
use abbr_storage::UrlRegistry;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Redirect;
use axum::Json;
use tracing::info;

use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse};
use crate::session::DbSession;
use crate::state::AppState;

/// Validates that the URL has a valid format (has a scheme and host).
fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(AppError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(AppError::InvalidUrl(format!(
            "URL must have a scheme and host: {}",
            url
        )));
    };

    if rest.is_empty() {
        return Err(AppError::InvalidUrl(format!(
            "URL must have a scheme and host: {}",
            url
        )));
    }

    // the stored URL becomes a Location header on redirect
    if url.chars().any(|c| c.is_whitespace() || c.is_control())
        || HeaderValue::from_str(url).is_err()
    {
        return Err(AppError::InvalidUrl(format!(
            "URL must not contain whitespace or control characters: {:?}",
            url
        )));
    }

    let scheme = scheme.to_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(AppError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            scheme
        )));
    }

    Ok(())
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    DbSession(mut session): DbSession,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload?;
    let name = ShortName::new(request.name)?;
    validate_url(&request.url)?;

    let expires_at = request
        .expire_at
        .as_deref()
        .map(expiry::to_timestamp)
        .transpose()?;

    // the registry does not enforce uniqueness, so claim the name here
    if session.lookup(&name).await?.is_some() {
        return Err(AppError::Conflict(name.to_string()));
    }

    let record = UrlRecord {
        url: request.url,
        expiry: expires_at,
    };
    session.insert(&name, record.clone()).await?;

    info!(name = %name, url = %record.url, "registered short url");

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse {
            short_url: name.to_url(state.base_url()),
            name: name.to_string(),
            url: record.url,
            expire_at: record.expiry.map(expiry::to_stored),
        }),
    ))
}

pub async fn get_url_handler(
    Path(name): Path<String>,
    DbSession(mut session): DbSession,
) -> Result<Json<GetUrlResponse>> {
    let name = ShortName::new(name)?;

    match session.lookup(&name).await? {
        Some(url) => Ok(Json(GetUrlResponse {
            name: name.to_string(),
            url,
        })),
        None => Err(AppError::NotFound(name.to_string())),
    }
}

pub async fn delete_url_handler(
    Path(name): Path<String>,
    DbSession(mut session): DbSession,
) -> Result<StatusCode> {
    let name = ShortName::new(name)?;
    let removed = session.delete(&name).await?;

    info!(name = %name, removed, "deleted short url");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn redirect_handler(
    Path(name): Path<String>,
    DbSession(mut session): DbSession,
) -> Result<Redirect> {
    let name = ShortName::new(name)?;

    match session.lookup(&name).await? {
        Some(url) => Ok(Redirect::temporary(&url)),
        None => Err(AppError::NotFound(name.to_string())),
    }
}
