//! HTTP server for sitemap, robots.txt, OpenGraph cards and the newsletter action.

use std::sync::{Arc, LazyLock};

use axum::{
    Router,
    extract::{Form, FromRequest, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use lingosite_generator::{
    FontSource, OpenGraphError, RobotsGenerator, SiteContent, SitemapGenerator,
    collector::CollectorError, opengraph, sitemap::generate_sitemap_xsl,
};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::site::Site;

/// Body of every not-found response.
pub const NOT_FOUND_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>404 Not Found</title></head>
<body><h1>404</h1><p>The page you are looking for does not exist.</p></body>
</html>
"#;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Server state.
#[derive(Debug)]
pub struct AppState {
    pub site: Site,
    /// Font for OpenGraph cards.
    pub font: FontSource,
}

/// Request errors mapped onto HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid form: {0}")]
    Form(String),

    #[error(transparent)]
    Content(#[from] CollectorError),

    #[error(transparent)]
    OpenGraph(#[from] OpenGraphError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response(),
            Self::InvalidEmail | Self::Form(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::Content(_) | Self::OpenGraph(_) | Self::Task(_) => {
                error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Create the server router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/sitemap.xsl", get(sitemap_xsl))
        .route("/robots.txt", get(robots_txt))
        .route("/404", get(not_found_page))
        .route("/_actions/newsletter", post(newsletter))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn load_content(state: &Arc<AppState>) -> Result<SiteContent, AppError> {
    let state = Arc::clone(state);
    Ok(tokio::task::spawn_blocking(move || state.site.collect()).await??)
}

async fn sitemap_xml(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let content = load_content(&state).await?;
    let xml = SitemapGenerator::new(&state.site.config, &state.site.localizer).generate(&content);
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response())
}

async fn sitemap_xsl(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    if !state.site.config.sitemap.stylesheet {
        return Err(AppError::NotFound);
    }
    Ok((
        [(header::CONTENT_TYPE, "text/xsl; charset=utf-8")],
        generate_sitemap_xsl(),
    )
        .into_response())
}

async fn robots_txt(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    if !state.site.config.robots.enabled {
        return Err(AppError::NotFound);
    }
    let body = RobotsGenerator::new(&state.site.config).generate();
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}

async fn not_found_page() -> AppError {
    AppError::NotFound
}

/// OpenGraph cards by file name, then static files from the public directory.
async fn fallback(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let path = request.uri().path().trim_start_matches('/');
    if let Some(id) = opengraph::parse_image_name(path).map(str::to_string) {
        let origin = request_origin(request.headers(), &state);
        return opengraph_image(state, id, origin).await;
    }

    let response = match ServeDir::new(state.site.public_dir()).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    if response.status() == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound);
    }
    Ok(response.into_response())
}

async fn opengraph_image(
    state: Arc<AppState>,
    id: String,
    origin: String,
) -> Result<Response, AppError> {
    let content = load_content(&state).await?;
    let Some(entry) = content.page(&id).cloned() else {
        debug!(%id, "no page for OpenGraph card");
        return Err(AppError::NotFound);
    };

    let font = state
        .font
        .load(&origin)
        .await
        .map_err(OpenGraphError::from)?;

    let png = tokio::task::spawn_blocking(move || {
        opengraph::render_entry_card(&entry, &state.site.config, &state.site.localizer, &font)
    })
    .await??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Origin the current request was addressed to, if the site answers on it.
///
/// `Host` must name the configured site origin or this server's own address
/// (bind host, `localhost` or `127.0.0.1` on the configured port). Any other
/// host falls back to the bind address.
fn request_origin(headers: &HeaderMap, state: &AppState) -> String {
    let config = &state.site.config;
    let server = &config.server;
    let fallback = format!("http://{}:{}", server.host, server.port);

    let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) else {
        return fallback;
    };

    let site_origin = config.origin();
    if origin_authority(site_origin).eq_ignore_ascii_case(host) {
        return site_origin.to_string();
    }

    let is_local = [server.host.as_str(), "localhost", "127.0.0.1"]
        .iter()
        .any(|name| host.eq_ignore_ascii_case(&format!("{name}:{}", server.port)));
    if is_local {
        return format!("http://{host}");
    }

    warn!(%host, "untrusted Host header, fetching font from bind address");
    fallback
}

/// `example.com:8080` from `https://example.com:8080/base`.
fn origin_authority(origin: &str) -> &str {
    let rest = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

/// Newsletter form fields.
#[derive(Debug, Deserialize)]
pub struct NewsletterForm {
    pub email: String,
    #[serde(default)]
    pub locale: Option<String>,
}

/// A newsletter form whose email passed validation.
#[derive(Debug)]
pub struct NewsletterSignup {
    pub email: String,
    pub locale: Option<String>,
}

impl<S> FromRequest<S> for NewsletterSignup
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<NewsletterForm>::from_request(req, state)
            .await
            .map_err(|e| AppError::Form(e.body_text()))?;

        let email = form.email.trim();
        if !is_valid_email(email) {
            warn!("rejected newsletter signup with invalid email");
            return Err(AppError::InvalidEmail);
        }

        Ok(Self {
            email: email.to_string(),
            locale: form.locale,
        })
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

async fn newsletter(State(state): State<Arc<AppState>>, signup: NewsletterSignup) -> Response {
    let localizer = &state.site.localizer;
    let locale = localizer.resolve(signup.locale.as_deref().unwrap_or(localizer.base_locale()));

    let key = "newsletter.greeting";
    let mut greeting = localizer.t_with(locale, key, &[("email", signup.email.as_str())]);
    if greeting == key {
        greeting = format!("Thanks for subscribing, {}!", signup.email);
    }

    info!(%locale, "newsletter signup accepted");
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], greeting).into_response()
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use axum::{
        body::{Body, to_bytes},
        http,
    };
    use lingosite_core::{Config, Localizer};
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, body).expect("write file");
    }

    fn state_with(font: FontSource) -> (TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(
            dir.path(),
            "content/pages/about.md",
            "---\ntitle: About\nalternates:\n  - locale: fr\n    slug: a-propos\n---\n",
        );
        write(dir.path(), "content/pages/a-propos.fr.md", "---\ntitle: À propos\n---\n");
        write(dir.path(), "public/hello.txt", "hello");

        let mut config = Config::new("Test", "https://example.com");
        config.i18n.locales = vec!["en".into(), "fr".into()];

        let mut site = Site::from_config(config, dir.path()).expect("site");
        site.localizer = Localizer::new(&site.config.i18n)
            .with_messages("fr", [("newsletter.greeting", "Merci {{email}} !")]);

        (dir, Arc::new(AppState { site, font }))
    }

    fn state() -> (TempDir, Arc<AppState>) {
        state_with(FontSource::Bytes(Arc::from(&b"not a font"[..])))
    }

    async fn send(
        state: Arc<AppState>,
        request: Request<Body>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = create_router(state).oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, headers, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn form(body: &'static str) -> Request<Body> {
        http::Request::builder()
            .method("POST")
            .uri("/_actions/newsletter")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn test_robots() {
        let (_dir, state) = state();
        let (status, headers, body) = send(state, get("/robots.txt")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        let body = String::from_utf8(body).unwrap();
        assert!(body.starts_with("User-agent: *\nAllow: /\n"));
        assert!(body.contains("Sitemap: https://example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_sitemap() {
        let (_dir, state) = state();
        let (status, headers, body) = send(state, get("/sitemap.xml")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/xml"));
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("<loc>https://example.com/about</loc>"));
        assert!(body.contains(
            r#"<xhtml:link rel="alternate" hreflang="fr" href="https://example.com/fr/a-propos"/>"#
        ));
    }

    #[tokio::test]
    async fn test_sitemap_stylesheet() {
        let (_dir, state) = state();
        let (status, _, body) = send(state, get("/sitemap.xsl")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("xsl:stylesheet"));
    }

    #[tokio::test]
    async fn test_opengraph_image() {
        let (_dir, state) = state();
        let (status, headers, body) = send(state, get("/opengraph-page-fr-a-propos.png")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert!(body.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn test_opengraph_unknown_page_is_not_found() {
        let (_dir, state) = state();
        let (status, _, body) = send(state, get("/opengraph-page-missing.png")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8(body).unwrap(), NOT_FOUND_HTML);
    }

    #[tokio::test]
    async fn test_opengraph_font_failure_is_server_error() {
        let (_dir, state) = state_with(FontSource::File("/nonexistent/font.ttf".into()));
        let (status, _, _) = send(state, get("/opengraph-page-about.png")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_static_files_and_not_found() {
        let (_dir, state) = state();
        let (status, _, body) = send(Arc::clone(&state), get("/hello.txt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"hello");

        let (status, _, body) = send(Arc::clone(&state), get("/missing.html")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8(body).unwrap(), NOT_FOUND_HTML);

        let (status, _, _) = send(state, get("/404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_newsletter_greeting() {
        let (_dir, state) = state();
        let (status, headers, body) =
            send(Arc::clone(&state), form("email=ada%40example.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "Thanks for subscribing, ada@example.com!"
        );

        let (_, _, body) = send(state, form("email=ada%40example.com&locale=fr")).await;
        assert_eq!(String::from_utf8(body).unwrap(), "Merci ada@example.com !");
    }

    #[tokio::test]
    async fn test_newsletter_rejects_invalid_email() {
        let (_dir, state) = state();
        let (status, _, _) = send(Arc::clone(&state), form("email=not-an-email")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(state, form("name=ada")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    fn host(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, value.parse().expect("header value"));
        headers
    }

    #[test]
    fn test_request_origin_accepts_known_hosts() {
        let (_dir, state) = state();
        let port = state.site.config.server.port;

        assert_eq!(request_origin(&host("example.com"), &state), "https://example.com");
        assert_eq!(
            request_origin(&host(&format!("localhost:{port}")), &state),
            format!("http://localhost:{port}")
        );
        assert_eq!(
            request_origin(&HeaderMap::new(), &state),
            format!("http://{}:{port}", state.site.config.server.host)
        );
    }

    #[test]
    fn test_request_origin_ignores_foreign_hosts() {
        let (_dir, state) = state();
        let server = &state.site.config.server;
        let bind = format!("http://{}:{}", server.host, server.port);

        let mut headers = host("attacker.test");
        headers.insert("x-forwarded-proto", "https".parse().expect("header value"));
        assert_eq!(request_origin(&headers, &state), bind);
        assert_eq!(request_origin(&host("example.com.attacker.test"), &state), bind);
        assert_eq!(request_origin(&host("localhost:1"), &state), bind);
    }

    #[test]
    fn test_origin_authority() {
        assert_eq!(origin_authority("https://example.com"), "example.com");
        assert_eq!(origin_authority("http://example.com:8080/docs"), "example.com:8080");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email(""));
    }
}
