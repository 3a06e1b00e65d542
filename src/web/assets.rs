use axum::{
    body::Body,
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

use super::WebError;

#[derive(RustEmbed)]
#[folder = "static"]
struct Asset;

/// GET /static/{*path}
pub async fn serve_static(Path(path): Path<String>) -> Result<Response, WebError> {
    let content = Asset::get(&path).ok_or_else(|| WebError::not_found("Asset", &path))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        Body::from(content.data),
    )
        .into_response())
}
