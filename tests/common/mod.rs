use axum::Router;
use tempfile::TempDir;

use quire::config::SiteConfig;
use quire::server::{router, AppState};
use quire::Site;

/// A site in a temporary directory and the router serving it.
///
/// The directory is removed when this struct is dropped.
pub struct TestEnv {
    pub dir: TempDir,
    pub site: Site,
    pub router: Router,
}

impl TestEnv {
    pub fn start() -> Self {
        Self::with_config(SiteConfig::default())
    }

    pub fn with_config(config: SiteConfig) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let site = Site::with_config(dir.path(), config);
        let state = AppState::from_site(&site).expect("Failed to build app state");
        let router = router(state);
        Self { dir, site, router }
    }

    /// Build an `axum_test::TestServer` that expects success by default.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: create an article through the API.
    pub async fn create(
        &self,
        server: &axum_test::TestServer,
        slug: &str,
        title: &str,
        date: &str,
        content: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/articles")
            .json(&serde_json::json!({
                "slug": slug,
                "title": title,
                "date": date,
                "content": content,
            }))
            .await
    }
}
