use abbr_core::{ShortName, UrlRecord};
use abbr_storage::{Database, DatabaseConfig, UrlRegistry};
use jiff::{SignedDuration, Timestamp};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    db: Database,
}

impl Fixture {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = DatabaseConfig::builder()
            .path(dir.path().join("abbr.db"))
            .build();

        let db = Database::connect(&config).await.expect("open sqlite");
        db.init_schema().await.expect("create schema");

        Self { _dir: dir, db }
    }

    async fn rows_for(&self, name: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE name = ?")
            .bind(name)
            .fetch_one(self.db.pool())
            .await
            .unwrap()
    }

    async fn insert_bypass(&self, name: &str, url: &str) {
        sqlx::query("INSERT INTO urls (name, url, expiry) VALUES (?, ?, NULL)")
            .bind(name)
            .bind(url)
            .execute(self.db.pool())
            .await
            .unwrap();
    }
}

fn name(value: &str) -> ShortName {
    ShortName::new(value).unwrap()
}

#[tokio::test]
async fn insert_is_visible_to_later_sessions() {
    let fixture = Fixture::start().await;

    let mut writer = fixture.db.session().await.unwrap();
    writer
        .insert(&name("ab12"), UrlRecord::new("https://example.com"))
        .await
        .unwrap();
    writer.release();

    let mut reader = fixture.db.session().await.unwrap();
    let url = reader.lookup(&name("ab12")).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn delete_commits_without_caller_involvement() {
    let fixture = Fixture::start().await;

    let mut session = fixture.db.session().await.unwrap();
    session
        .insert(&name("gone"), UrlRecord::new("https://example.com"))
        .await
        .unwrap();
    assert!(session.delete(&name("gone")).await.unwrap());
    drop(session);

    assert_eq!(fixture.rows_for("gone").await, 0);
}

#[tokio::test]
async fn expired_lookup_removes_row_for_everyone() {
    let fixture = Fixture::start().await;
    let expired: Timestamp = "2000-01-01T00:00:00Z".parse().unwrap();

    let mut session = fixture.db.session().await.unwrap();
    session
        .insert(&name("x"), UrlRecord::new("https://a.com").with_expiry(expired))
        .await
        .unwrap();
    assert_eq!(fixture.rows_for("x").await, 1);

    assert!(session.lookup(&name("x")).await.unwrap().is_none());
    assert_eq!(fixture.rows_for("x").await, 0);
}

#[tokio::test]
async fn future_expiry_resolves_until_it_passes() {
    let fixture = Fixture::start().await;
    let now = Timestamp::now();
    let expiry = now + SignedDuration::from_mins(10);

    let mut session = fixture.db.session().await.unwrap();
    session
        .insert(
            &name("later"),
            UrlRecord::new("https://example.com").with_expiry(expiry),
        )
        .await
        .unwrap();

    let url = session.lookup(&name("later")).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com"));

    let after = expiry + SignedDuration::from_secs(1);
    assert!(session.lookup_at(&name("later"), after).await.unwrap().is_none());
    assert!(session.lookup(&name("later")).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_rows_are_purged_on_lookup() {
    let fixture = Fixture::start().await;
    fixture.insert_bypass("twin", "https://one.example").await;
    fixture.insert_bypass("twin", "https://two.example").await;

    let mut session = fixture.db.session().await.unwrap();
    assert!(session.lookup(&name("twin")).await.unwrap().is_none());
    drop(session);

    assert_eq!(fixture.rows_for("twin").await, 0);
}

#[tokio::test]
async fn unchecked_insert_allows_duplicates() {
    let fixture = Fixture::start().await;

    let mut session = fixture.db.session().await.unwrap();
    session
        .insert(&name("same"), UrlRecord::new("https://one.example"))
        .await
        .unwrap();
    session
        .insert(&name("same"), UrlRecord::new("https://two.example"))
        .await
        .unwrap();
    assert_eq!(fixture.rows_for("same").await, 2);

    assert!(session.lookup(&name("same")).await.unwrap().is_none());
    assert_eq!(fixture.rows_for("same").await, 0);
}

#[tokio::test]
async fn schema_init_is_repeatable() {
    let fixture = Fixture::start().await;

    let mut session = fixture.db.session().await.unwrap();
    session
        .insert(&name("keep"), UrlRecord::new("https://example.com"))
        .await
        .unwrap();
    drop(session);

    fixture.db.init_schema().await.unwrap();
    assert_eq!(fixture.rows_for("keep").await, 1);
}

#[tokio::test]
async fn concurrent_sessions_are_independent() {
    let fixture = Fixture::start().await;
    let mut handles = vec![];

    for i in 0..4u32 {
        let db = fixture.db.clone();
        handles.push(tokio::spawn(async move {
            let mut session = db.session().await.unwrap();
            let n = ShortName::new(format!("code-{i}")).unwrap();
            session
                .insert(&n, UrlRecord::new(format!("https://example{i}.com")))
                .await
                .unwrap();
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let mut session = fixture.db.session().await.unwrap();
    for i in 0..4u32 {
        let n = ShortName::new(format!("code-{i}")).unwrap();
        let url = session.lookup(&n).await.unwrap();
        assert_eq!(url, Some(format!("https://example{i}.com")));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_expired_lookups_do_not_fail() {
    let fixture = Fixture::start().await;
    let expired: Timestamp = "2000-01-01T00:00:00Z".parse().unwrap();

    for round in 0..10u32 {
        let mut seed = fixture.db.session().await.unwrap();
        for i in 0..5u32 {
            let n = ShortName::new(format!("old-{round}-{i}")).unwrap();
            seed.insert(&n, UrlRecord::new("https://a.com").with_expiry(expired))
                .await
                .unwrap();
        }
        seed.release();

        let mut handles = vec![];
        for i in 0..5u32 {
            let db = fixture.db.clone();
            handles.push(tokio::spawn(async move {
                let mut session = db.session().await.unwrap();
                let n = ShortName::new(format!("old-{round}-{i}")).unwrap();
                session.lookup(&n).await
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(matches!(result, Ok(None)), "lookup failed: {result:?}");
        }
    }
}
