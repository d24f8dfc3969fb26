//! Receipt uploads.

use std::path::Path;

use api_types::upload::Uploaded;
use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use chrono::Utc;
use engine::User;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn multipart_error(err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::TooLarge(err.body_text())
    } else {
        ServerError::Generic(err.body_text())
    }
}

/// `file-<unix millis>-<random hex>` plus the original extension.
fn stored_name(original: &str) -> String {
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!(
        "file-{}-{}{extension}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// Store the multipart `file` field in the upload directory.
pub async fn upload(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>, ServerError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let stored = stored_name(&file_name);
        let upload_dir = &state.config.upload_dir;
        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|err| ServerError::Upload(err.to_string()))?;
        tokio::fs::write(upload_dir.join(&stored), &bytes)
            .await
            .map_err(|err| ServerError::Upload(err.to_string()))?;

        tracing::info!(
            user_id = %user.id,
            file = %stored,
            size = bytes.len(),
            "file uploaded"
        );
        return Ok(Json(Uploaded {
            file_path: format!("/uploads/{stored}"),
            file_name,
        }));
    }

    Err(ServerError::Generic("Please upload a file.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_keeps_extension() {
        let name = stored_name("receipt.PDF");
        assert!(name.starts_with("file-"));
        assert!(name.ends_with(".PDF"));
        // file-<millis>-<32 hex chars>.PDF
        let middle = &name["file-".len()..name.len() - ".PDF".len()];
        let (millis, random) = middle.split_once('-').unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(random.len(), 32);
    }

    #[test]
    fn stored_name_without_extension() {
        let name = stored_name("receipt");
        assert!(!name.contains('.'));
        assert!(!stored_name("../../etc/passwd").contains('/'));
    }
}
