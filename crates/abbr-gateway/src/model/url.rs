use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateUrlRequest {
    pub name: String,
    pub url: String,
    /// RFC 3339 timestamp, or a naive datetime read as UTC.
    pub expire_at: Option<String>,
}

#[derive(Serialize)]
pub struct CreateUrlResponse {
    pub name: String,
    pub short_url: String,
    pub url: String,
    pub expire_at: Option<String>,
}

#[derive(Serialize)]
pub struct GetUrlResponse {
    pub name: String,
    pub url: String,
}
