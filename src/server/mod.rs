//! HTTP server for the authoring and reader surfaces

mod api;
mod errors;
mod reader;

pub use api::{ArticleBody, ArticleView, SlugResponse, UploadResponse, UPLOAD_FIELD};
pub use reader::RenderedArticle;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::assets::AssetStore;
use crate::content::{ComponentMap, ContentService, MarkdownRenderer};
use crate::Site;

/// Room for multipart boundaries and part headers on top of the file cap
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: ContentService,
    pub assets: AssetStore,
    pub components: Arc<ComponentMap>,
    pub renderer: MarkdownRenderer,
}

impl AppState {
    pub fn new(service: ContentService, assets: AssetStore, components: ComponentMap) -> Self {
        Self {
            service,
            assets,
            components: Arc::new(components),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// State wired from a site's configuration
    pub fn from_site(site: &Site) -> Result<Self> {
        Ok(Self::new(
            site.service(),
            site.assets(),
            site.config.component_map()?,
        ))
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.assets.max_bytes() + MULTIPART_OVERHEAD;
    let upload_root = state.assets.root().to_path_buf();
    let upload_prefix = state.assets.url_prefix().to_string();

    let app = Router::new()
        .route(
            "/api/articles",
            get(api::get_articles)
                .post(api::create_article)
                .put(api::update_article)
                .delete(api::delete_article)
                .fallback(api::articles_method_not_allowed),
        )
        .route(
            "/api/upload",
            post(api::upload_image)
                .fallback(api::upload_method_not_allowed)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/articles", get(reader::list_previews))
        .route("/articles/{slug}", get(reader::show_article));

    let app = if upload_prefix.is_empty() {
        app.fallback_service(ServeDir::new(upload_root))
    } else {
        app.nest_service(&upload_prefix, ServeDir::new(upload_root))
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(AppState::from_site(site)?);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Articles are read from {}", site.content_dir.display());
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
