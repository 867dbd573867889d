mod url;

pub use url::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse};

use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
