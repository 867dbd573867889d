use abbr_storage::Database;

#[derive(Clone)]
pub struct AppState {
    db: Database,
    base_url: String,
}

impl AppState {
    pub fn new(db: Database, public_base_url: impl Into<String>) -> Self {
        Self {
            db,
            base_url: public_base_url.into(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Base URL that short links are rendered against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
