//! Live server rendering pages from the content repository on each request

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{DetailAssembler, ListingAggregator, Post, POST_TYPE};
use crate::generator::context;
use crate::helpers::{encode_query, Helpers};
use crate::prismic::{ContentClient, Ordering, PagedResult, PrismicClient};
use crate::templates::TemplateRenderer;
use crate::Spacetraveling;

/// Cookie carrying the preview ref
pub const PREVIEW_COOKIE: &str = "io.prismic.preview";

/// Server state
pub struct ServerState {
    helpers: Helpers,
    renderer: TemplateRenderer,
    client: Arc<dyn ContentClient>,
    source_dir: PathBuf,
    /// `root` without its trailing slash; empty when the site lives at `/`
    prefix: String,
}

impl ServerState {
    pub fn new(site: &Spacetraveling, client: Arc<dyn ContentClient>) -> Result<Self> {
        let root = site.config.root.trim_matches('/');
        let prefix = if root.is_empty() {
            String::new()
        } else {
            format!("/{}", root)
        };

        Ok(Self {
            helpers: Helpers::new(site.config.clone()),
            renderer: TemplateRenderer::new()?,
            client,
            source_dir: site.source_dir.clone(),
            prefix,
        })
    }

    /// Route path under the site root
    fn route(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    /// Request path relative to the site root, `None` outside of it
    fn strip_root<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Where the "load more" button fetches the page behind `cursor`
    fn posts_link(&self, cursor: Option<&str>) -> Option<String> {
        cursor.map(|c| {
            format!(
                "{}?cursor={}",
                self.helpers.url_for("api/posts"),
                encode_query(c)
            )
        })
    }

    fn render(&self, template: &str, context: &tera::Context) -> Result<Html<String>, ServerError> {
        self.renderer
            .render(template, context)
            .map(Html)
            .map_err(ServerError::Render)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Content(#[from] crate::Error),
    #[error("template rendering failed: {0}")]
    Render(anyhow::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Content(crate::Error::NoMorePages) => StatusCode::BAD_REQUEST,
            ServerError::Content(crate::Error::PostNotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Content(crate::Error::UpstreamQuery(_))
            | ServerError::Content(crate::Error::MalformedDocument { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            ServerError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, %status, "Replying with error");
        (status, self.to_string()).into_response()
    }
}

/// Build the router, with every route under the configured `root`
///
/// Post links end with a slash, so post routes match with and without it.
pub fn router(state: Arc<ServerState>) -> Router {
    let mut app = Router::new()
        .route(&state.route("/"), get(home_handler))
        .route(&state.route("/post/:uid"), get(post_handler))
        .route(&state.route("/post/:uid/"), get(post_handler))
        .route(&state.route("/api/posts"), get(posts_handler))
        .route(&state.route("/api/preview"), get(preview_handler))
        .route(&state.route("/api/exit-preview"), get(exit_preview_handler));

    if !state.prefix.is_empty() {
        app = app.route(&state.prefix, get(home_handler));
    }

    app.fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve source assets (stylesheets, images, etc.) below the site root
async fn static_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some(path) = state.strip_root(parts.uri.path()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    parts.uri = match path_and_query.parse::<Uri>() {
        Ok(uri) => uri,
        Err(_) => return (StatusCode::BAD_REQUEST, "Bad request").into_response(),
    };

    let mut service = ServeDir::new(&state.source_dir);
    match service.try_call(Request::from_parts(parts, body)).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Start the server
pub async fn start(site: &Spacetraveling, ip: &str, port: u16, open: bool) -> Result<()> {
    let client = PrismicClient::from_config(&site.config)?;
    let state = Arc::new(ServerState::new(site, Arc::new(client))?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Preview ref carried by the request cookies, if any
fn preview_ref(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == PREVIEW_COOKIE)
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
        .filter(|value| !value.is_empty())
}

async fn home_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Html<String>, ServerError> {
    let listing = ListingAggregator::new(state.client.as_ref());
    let page = listing
        .initialize(state.helpers.config().per_page, Ordering::PublicationDateDesc)
        .await?;

    let next_link = state.posts_link(page.next_page.as_deref());
    let preview = preview_ref(&headers).is_some();
    let context = context::home_context(&state.helpers, &page, next_link, preview);
    state.render("index.html", &context)
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let reference = preview_ref(&headers);
    let detail = DetailAssembler::new(state.client.as_ref());

    let post: Post = match detail.resolve_post(&uid, reference.as_deref()).await {
        Ok(post) => post,
        Err(crate::Error::PostNotFound(uid)) => {
            tracing::debug!("Post not found: {}", uid);
            let html = state.render("404.html", &context::not_found_context(&state.helpers))?;
            return Ok((StatusCode::NOT_FOUND, html).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let adjacent = detail.resolve_adjacent(&post).await?;
    let context = context::post_context(&state.helpers, &post, &adjacent, reference.is_some());
    Ok(state.render("post.html", &context)?.into_response())
}

#[derive(Debug, Deserialize)]
struct PostsQuery {
    cursor: Option<String>,
}

async fn posts_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostsQuery>,
) -> Result<Response, ServerError> {
    let listing = ListingAggregator::new(state.client.as_ref());
    let current = PagedResult::<Post> {
        next_page: query.cursor.filter(|c| !c.is_empty()),
        results: Vec::new(),
    };

    let page = listing.load_next(&current).await?;
    let next_link = state.posts_link(page.next_page.as_deref());
    Ok(Json(context::posts_page(&state.helpers, &page, next_link)).into_response())
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    token: String,
    #[serde(rename = "documentId")]
    document_id: String,
}

async fn preview_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, ServerError> {
    let document = state
        .client
        .get_by_id(&query.document_id, Some(&query.token))
        .await?;

    let location = match document {
        Some(doc) if doc.doc_type == POST_TYPE => match doc.uid {
            Some(uid) => state.helpers.post_url(&uid),
            None => state.helpers.url_for(""),
        },
        _ => state.helpers.url_for(""),
    };
    tracing::info!("Entering preview, redirecting to {}", location);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        PREVIEW_COOKIE,
        encode_query(&query.token)
    );
    Ok(([(header::SET_COOKIE, cookie)], Redirect::temporary(&location)).into_response())
}

async fn exit_preview_handler(State(state): State<Arc<ServerState>>) -> Response {
    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", PREVIEW_COOKIE);
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::temporary(&state.helpers.url_for("")),
    )
        .into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
