//! Request handlers for the `/api/v1/fs` surface.
//!
//! Handlers are stateless per request: they normalize the wildcard path,
//! dispatch to the [`FileService`], and serialize the result. All path
//! safety and write atomicity live in the `sandfs` crate; nothing here
//! touches the filesystem directly.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, Path as UrlPath, Query, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use sandfs::{FileService, FsError, NodeKind};
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;

use super::error::ApiError;

/// Shared handle to the file service, injected once at router construction.
pub type SharedService = Arc<FileService>;

/// Upper bound for buffered JSON bodies. File content goes through the
/// streaming paths and is not subject to this limit.
const JSON_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GetQuery {
    stat: bool,
    download: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PostQuery {
    overwrite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PutQuery {
    overwrite: bool,
    create: bool,
    new_name: Option<String>,
}

impl Default for PutQuery {
    fn default() -> Self {
        Self {
            overwrite: false,
            create: true,
            new_name: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DeleteQuery {
    recursive: bool,
}

#[derive(Debug, Deserialize)]
struct CreateDirBody {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameBody {
    #[serde(rename = "newName")]
    new_name: String,
}

/// GET: node metadata (`stat=true`), a directory listing, or file content.
pub async fn get_node(
    State(svc): State<SharedService>,
    path: Option<UrlPath<String>>,
    Query(query): Query<GetQuery>,
) -> Result<Response, ApiError> {
    let rel = rel_path(path);
    let node = svc.stat(&rel)?;

    if query.stat {
        return Ok(Json(node).into_response());
    }

    if node.kind == NodeKind::Directory {
        let listing = svc.list(&rel)?;
        return Ok(Json(listing).into_response());
    }

    serve_file(&svc, &rel, query.download)
}

/// Stream a file back with a detected content type.
fn serve_file(svc: &FileService, rel: &str, download: bool) -> Result<Response, ApiError> {
    let mime = svc
        .detect_mime(rel)
        .unwrap_or("application/octet-stream");
    let (file, node) = svc.open(rel)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(node.size));
    if download {
        let disposition = format!("attachment; filename=\"{}\"", node.name);
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }

    let stream = ReaderStream::new(tokio::fs::File::from_std(file));
    Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
}

/// POST: multipart upload into a directory, or JSON `{name}` to create a
/// subdirectory.
pub async fn post_node(
    State(svc): State<SharedService>,
    path: Option<UrlPath<String>>,
    Query(query): Query<PostQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    let rel = rel_path(path);

    let target = svc.stat(&rel)?;
    if target.kind != NodeKind::Directory {
        return Err(FsError::NotADirectory(rel.into()).into());
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| ApiError::bad_request("invalid multipart form"))?;
        return upload_files(&svc, &rel, query.overwrite, multipart).await;
    }

    let bytes = axum::body::to_bytes(request.into_body(), JSON_BODY_LIMIT)
        .await
        .map_err(|_| ApiError::bad_request("invalid request body"))?;
    let body: CreateDirBody = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::bad_request("invalid request body"))?;
    create_subdir(&svc, &rel, body.name.trim())
}

/// Stream every `files` part into the target directory atomically.
async fn upload_files(
    svc: &FileService,
    rel: &str,
    overwrite: bool,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut uploaded = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("invalid multipart form"))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().map(base_name).unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let dest = join_rel(rel, &name);
        let mut saver = svc.start_save(&dest, overwrite)?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::bad_request("malformed multipart field"))?
        {
            saver.write_all(&chunk).map_err(FsError::Io)?;
        }
        saver.commit().map_err(FsError::Io)?;

        tracing::debug!(path = %dest, "uploaded file");
        uploaded.push(name);
    }

    if uploaded.is_empty() {
        return Err(ApiError::bad_request("no files provided"));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "uploaded": uploaded })),
    )
        .into_response())
}

/// Create `rel/name` as a new directory; an existing node is a conflict.
fn create_subdir(svc: &FileService, rel: &str, name: &str) -> Result<Response, ApiError> {
    if name.is_empty() {
        return Err(ApiError::bad_request("invalid request body"));
    }

    let new_rel = join_rel(rel, name);
    if svc.stat(&new_rel).is_ok() {
        return Err(FsError::AlreadyExists(new_rel.into()).into());
    }
    svc.mkdir_all(&new_rel)?;

    tracing::info!(path = %new_rel, "created directory");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "path": new_rel })),
    )
        .into_response())
}

/// PUT: rename an existing directory (`new_name` query), or write the raw
/// body as full file content.
pub async fn put_node(
    State(svc): State<SharedService>,
    path: Option<UrlPath<String>>,
    Query(query): Query<PutQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let rel = rel_path(path);

    if let Ok(node) = svc.stat(&rel) {
        if node.kind == NodeKind::Directory {
            let Some(new_name) = query.new_name.as_deref() else {
                return Err(FsError::IsADirectory(rel.into()).into());
            };
            let new_rel = sibling_rel(&rel, new_name.trim())?;
            svc.rename(&rel, &new_rel, query.overwrite)?;

            tracing::info!(from = %rel, to = %new_rel, "renamed directory");
            return Ok(success_response(StatusCode::OK));
        }
    }

    svc.write_file(&rel, &body, query.create)?;
    tracing::debug!(path = %rel, bytes = body.len(), "wrote file");
    Ok(success_response(StatusCode::OK))
}

/// DELETE: remove a node; `recursive=true` removes a whole tree.
pub async fn delete_node(
    State(svc): State<SharedService>,
    path: Option<UrlPath<String>>,
    Query(query): Query<DeleteQuery>,
) -> Result<Response, ApiError> {
    let rel = rel_path(path);

    if query.recursive {
        svc.delete_recursive(&rel)?;
    } else {
        svc.delete(&rel)?;
    }

    tracing::info!(path = %rel, recursive = query.recursive, "deleted node");
    Ok(success_response(StatusCode::OK))
}

/// PATCH: rename a node within its parent directory, body `{newName}`.
pub async fn patch_node(
    State(svc): State<SharedService>,
    path: Option<UrlPath<String>>,
    Json(body): Json<RenameBody>,
) -> Result<Response, ApiError> {
    let rel = rel_path(path);
    let new_rel = sibling_rel(&rel, body.new_name.trim())?;
    svc.rename(&rel, &new_rel, false)?;

    tracing::info!(from = %rel, to = %new_rel, "renamed node");
    Ok(success_response(StatusCode::OK))
}

/// Normalize the wildcard segment: absent means the root, and a leading
/// separator is stripped so the path stays root-relative.
fn rel_path(path: Option<UrlPath<String>>) -> String {
    path.map(|UrlPath(p)| p.trim_start_matches('/').to_string())
        .unwrap_or_default()
}

/// Join a child name under a relative directory path.
fn join_rel(rel: &str, name: &str) -> String {
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{rel}/{name}")
    }
}

/// Strip any directory components from a client-supplied file name.
fn base_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Destination path for renaming `rel` to `new_name` within its parent.
fn sibling_rel(rel: &str, new_name: &str) -> Result<String, ApiError> {
    if new_name.is_empty() {
        return Err(FsError::MissingNewName.into());
    }
    if rel.is_empty() {
        return Err(ApiError::bad_request("cannot rename the root directory"));
    }
    let parent = Path::new(rel)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(join_rel(&parent, new_name))
}

fn success_response(status: StatusCode) -> Response {
    (status, Json(json!({ "success": true }))).into_response()
}
