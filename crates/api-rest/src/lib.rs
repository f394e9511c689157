//! # API REST
//!
//! REST API implementation for the CMS.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Bearer token authentication
//!
//! Uses `api-shared` for request/response bodies and `cms-core` for storage and pages.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    auth::validate_bearer, ContentEntry, ContentsRes, DeleteFileReq, DeleteFileRes,
    DirectoryRes, FileRes, HealthRes, HealthService, ListPagesRes, ListReposRes, PageRes,
    PageSummaryRes, RepoItem, SaveFileReq, SaveFileRes, SlugConflictRes, SlugConflictsRes,
};
use cms_core::{
    render_page, CmsError, CommitMessage, ContentStore, CoreConfig, EntryKind, GitWorkspace,
    PageService, RepositoryHost, Revision, Slug,
};

type ApiError = (StatusCode, &'static str);

/// Application state for the REST API server.
///
/// Holds the repository host every handler opens stores from, the pages directory inside each
/// repository and the access token required on every route except `/health`.
#[derive(Clone)]
pub struct AppState {
    host: Arc<dyn RepositoryHost>,
    pages_dir: Arc<str>,
    access_token: Arc<str>,
}

impl AppState {
    pub fn new(host: Arc<dyn RepositoryHost>, pages_dir: &str, access_token: &str) -> Self {
        Self {
            host,
            pages_dir: pages_dir.into(),
            access_token: access_token.into(),
        }
    }

    /// State backed by the git repositories under the configured content root.
    pub fn from_config(cfg: &CoreConfig, access_token: &str) -> Self {
        let workspace = GitWorkspace::new(cfg.content_root(), cfg.author().clone());
        Self::new(Arc::new(workspace), cfg.pages_dir(), access_token)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_repos,
        get_contents,
        save_contents,
        delete_contents,
        list_pages,
        page_by_slug,
        slug_conflicts,
        render_by_slug,
        render_site_root,
        render_site_path,
    ),
    components(schemas(
        HealthRes,
        RepoItem,
        ListReposRes,
        ContentEntry,
        DirectoryRes,
        FileRes,
        ContentsRes,
        SaveFileReq,
        SaveFileRes,
        DeleteFileReq,
        DeleteFileRes,
        PageSummaryRes,
        ListPagesRes,
        PageRes,
        SlugConflictRes,
        SlugConflictsRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with every route, the Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/repos", get(list_repos))
        .route(
            "/repos/:repo/contents",
            get(get_contents)
                .post(save_contents)
                .delete(delete_contents),
        )
        .route("/repos/:repo/pages", get(list_pages))
        .route("/repos/:repo/pages/by-slug", get(page_by_slug))
        .route("/repos/:repo/pages/conflicts", get(slug_conflicts))
        .route("/repos/:repo/render", get(render_by_slug))
        .route("/repos/:repo/site", get(render_site_root))
        .route("/repos/:repo/site/*path", get(render_site_path))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn require_bearer_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match validate_bearer(header, &state.access_token) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

/// Map a core error onto a status. Anything that is not the caller's fault is logged.
fn status_for(context: &str, e: CmsError) -> ApiError {
    match e {
        CmsError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
        CmsError::Conflict(_) => (StatusCode::CONFLICT, "Revision conflict"),
        CmsError::InvalidInput(_) | CmsError::InvalidPath { .. } | CmsError::NotText(_) => {
            (StatusCode::BAD_REQUEST, "Bad request")
        }
        e => {
            tracing::error!("{} error: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn open_store(state: &AppState, repo: &str) -> Result<Arc<dyn ContentStore>, ApiError> {
    state.host.open(repo).map_err(|e| status_for("Open repository", e))
}

fn page_service(state: &AppState, repo: &str) -> Result<PageService, ApiError> {
    let store = open_store(state, repo)?;
    PageService::new(store, &state.pages_dir).map_err(|e| status_for("Page service", e))
}

fn parse_slug(raw: &str) -> Result<Slug, ApiError> {
    Slug::new(raw).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid slug"))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API. Does not require a token.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/repos",
    responses(
        (status = 200, description = "Content repositories", body = ListReposRes),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn list_repos(State(state): State<AppState>) -> Result<Json<ListReposRes>, ApiError> {
    let repos = state
        .host
        .list_repos()
        .map_err(|e| status_for("List repositories", e))?
        .into_iter()
        .map(|r| RepoItem {
            name: r.name,
            path: r.path,
        })
        .collect();
    Ok(Json(ListReposRes { repos }))
}

#[derive(Debug, Deserialize)]
struct ContentsQuery {
    path: Option<String>,
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/contents",
    params(
        ("repo" = String, Path, description = "Repository name"),
        ("path" = Option<String>, Query, description = "File or directory; defaults to the pages directory")
    ),
    responses(
        (status = 200, description = "File content or directory listing", body = ContentsRes),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such repository, file or directory"),
        (status = 500, description = "Internal server error")
    )
)]
/// Read a file, or list a directory when the path is not a file.
#[axum::debug_handler]
async fn get_contents(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
    Query(query): Query<ContentsQuery>,
) -> Result<Json<ContentsRes>, ApiError> {
    let store = open_store(&state, &repo)?;
    let path = query
        .path
        .unwrap_or_else(|| state.pages_dir.to_string());
    let path = path.trim_matches('/').to_string();

    if !path.is_empty() {
        match store.get(&path) {
            Ok(file) => {
                return Ok(Json(ContentsRes::File(FileRes {
                    path: file.path,
                    content: file.content,
                    sha: file.revision.to_string(),
                })));
            }
            Err(CmsError::NotFound(_)) => {}
            Err(e) => return Err(status_for("Read file", e)),
        }
    }

    let entries = store
        .list(&path)
        .map_err(|e| status_for("List directory", e))?
        .into_iter()
        .map(|entry| ContentEntry {
            name: entry.name,
            path: entry.path,
            kind: match entry.kind {
                EntryKind::File => "file".into(),
                EntryKind::Dir => "dir".into(),
            },
            sha: entry.revision.map(|r| r.to_string()),
        })
        .collect();

    Ok(Json(ContentsRes::Directory(DirectoryRes { path, entries })))
}

#[utoipa::path(
    post,
    path = "/repos/{repo}/contents",
    params(("repo" = String, Path, description = "Repository name")),
    request_body = SaveFileReq,
    responses(
        (status = 200, description = "File committed", body = SaveFileRes),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such repository"),
        (status = 409, description = "Revision does not match the current file"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create or update a file as one commit.
///
/// Without `sha` the file must not exist yet; with `sha` it must be the current revision.
#[axum::debug_handler]
async fn save_contents(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
    Json(req): Json<SaveFileReq>,
) -> Result<Json<SaveFileRes>, ApiError> {
    let (Some(path), Some(content), Some(message)) = (
        req.path.filter(|p| !p.is_empty()),
        req.content.filter(|c| !c.is_empty()),
        req.message,
    ) else {
        return Err((StatusCode::BAD_REQUEST, "Missing required fields"));
    };
    let message = CommitMessage::new(&message)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid commit message"))?;

    let store = open_store(&state, &repo)?;
    let revision = req.sha.filter(|s| !s.is_empty()).map(Revision::new);
    let sha = store
        .put(&path, &content, revision.as_ref(), &message)
        .map_err(|e| status_for("Save file", e))?;

    tracing::info!("Saved {} in {} at {}", path, repo, sha);
    Ok(Json(SaveFileRes {
        path,
        sha: sha.to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/repos/{repo}/contents",
    params(("repo" = String, Path, description = "Repository name")),
    request_body = DeleteFileReq,
    responses(
        (status = 200, description = "File deleted", body = DeleteFileRes),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such repository or file"),
        (status = 409, description = "Revision does not match the current file"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn delete_contents(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
    Json(req): Json<DeleteFileReq>,
) -> Result<Json<DeleteFileRes>, ApiError> {
    let (Some(path), Some(sha), Some(message)) = (
        req.path.filter(|p| !p.is_empty()),
        req.sha.filter(|s| !s.is_empty()),
        req.message,
    ) else {
        return Err((StatusCode::BAD_REQUEST, "Missing required fields"));
    };
    let message = CommitMessage::new(&message)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid commit message"))?;

    let store = open_store(&state, &repo)?;
    store
        .delete(&path, &Revision::new(sha), &message)
        .map_err(|e| status_for("Delete file", e))?;

    tracing::info!("Deleted {} in {}", path, repo);
    Ok(Json(DeleteFileRes { path }))
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/pages",
    params(("repo" = String, Path, description = "Repository name")),
    responses(
        (status = 200, description = "Pages sorted by file name", body = ListPagesRes),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such repository"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn list_pages(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
) -> Result<Json<ListPagesRes>, ApiError> {
    let pages = page_service(&state, &repo)?
        .list_pages()
        .map_err(|e| status_for("List pages", e))?
        .into_iter()
        .map(|p| PageSummaryRes {
            path: p.path,
            sha: p.revision.to_string(),
            title: p.title,
            slug: p.slug,
            block_count: p.block_count,
        })
        .collect();
    Ok(Json(ListPagesRes { pages }))
}

#[derive(Debug, Deserialize)]
struct SlugQuery {
    slug: Option<String>,
}

impl SlugQuery {
    fn slug(&self) -> Result<Slug, ApiError> {
        match self.slug.as_deref() {
            Some(raw) => parse_slug(raw),
            None => Ok(Slug::root()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/pages/by-slug",
    params(
        ("repo" = String, Path, description = "Repository name"),
        ("slug" = Option<String>, Query, description = "Page slug; defaults to /")
    ),
    responses(
        (status = 200, description = "Parsed page", body = PageRes),
        (status = 400, description = "Invalid slug"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No page has this slug"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn page_by_slug(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
    Query(query): Query<SlugQuery>,
) -> Result<Json<PageRes>, ApiError> {
    let slug = query.slug()?;
    let loaded = page_service(&state, &repo)?
        .find_by_slug(&slug)
        .map_err(|e| status_for("Find page", e))?
        .ok_or((StatusCode::NOT_FOUND, "Page not found"))?;

    let page = serde_json::to_value(&loaded.content).map_err(|e| {
        tracing::error!("Encode page error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    Ok(Json(PageRes {
        path: loaded.path,
        sha: loaded.revision.to_string(),
        page,
    }))
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/pages/conflicts",
    params(("repo" = String, Path, description = "Repository name")),
    responses(
        (status = 200, description = "Slugs claimed by more than one page", body = SlugConflictsRes),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such repository"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn slug_conflicts(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
) -> Result<Json<SlugConflictsRes>, ApiError> {
    let conflicts = page_service(&state, &repo)?
        .slug_conflicts()
        .map_err(|e| status_for("Slug conflicts", e))?
        .into_iter()
        .map(|c| SlugConflictRes {
            slug: c.slug,
            paths: c.paths,
        })
        .collect();
    Ok(Json(SlugConflictsRes { conflicts }))
}

fn render_slug(state: &AppState, repo: &str, slug: &Slug) -> Result<Html<String>, ApiError> {
    let loaded = page_service(state, repo)?
        .find_by_slug(slug)
        .map_err(|e| status_for("Find page", e))?
        .ok_or((StatusCode::NOT_FOUND, "Page not found"))?;
    Ok(Html(render_page(&loaded.content)))
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/render",
    params(
        ("repo" = String, Path, description = "Repository name"),
        ("slug" = Option<String>, Query, description = "Page slug; defaults to /")
    ),
    responses(
        (status = 200, description = "Rendered page HTML", body = String, content_type = "text/html"),
        (status = 400, description = "Invalid slug"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No page has this slug"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn render_by_slug(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
    Query(query): Query<SlugQuery>,
) -> Result<Html<String>, ApiError> {
    let slug = query.slug()?;
    render_slug(&state, &repo, &slug)
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/site",
    params(("repo" = String, Path, description = "Repository name")),
    responses(
        (status = 200, description = "Rendered home page", body = String, content_type = "text/html"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No page has the slug /"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn render_site_root(
    State(state): State<AppState>,
    AxumPath(repo): AxumPath<String>,
) -> Result<Html<String>, ApiError> {
    render_slug(&state, &repo, &Slug::root())
}

#[utoipa::path(
    get,
    path = "/repos/{repo}/site/{path}",
    params(
        ("repo" = String, Path, description = "Repository name"),
        ("path" = String, Path, description = "Slug segments, e.g. about/team")
    ),
    responses(
        (status = 200, description = "Rendered page HTML", body = String, content_type = "text/html"),
        (status = 400, description = "Invalid slug"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No page has this slug"),
        (status = 500, description = "Internal server error")
    )
)]
/// Render the page whose slug is built from the request path segments.
#[axum::debug_handler]
async fn render_site_path(
    State(state): State<AppState>,
    AxumPath((repo, path)): AxumPath<(String, String)>,
) -> Result<Html<String>, ApiError> {
    let slug = Slug::from_segments(path.split('/'))
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid slug"))?;
    render_slug(&state, &repo, &slug)
}
