//! Log entry handlers, including the review workflow.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use tracing::info;

use auditbind_core::error::AppError;
use auditbind_core::types::EntryId;
use auditbind_entity::LogEntry;
use auditbind_middleware::RequestUser;
use auditbind_store::{EntryFilter, ObjectStore};

use crate::dto::request::{EntryQuery, StageChangesRequest};
use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/entries?app=...&model=...&pk=...
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> Result<Json<ApiResponse<Vec<LogEntry>>>, AppError> {
    let content_type = match (query.app.as_deref(), query.model.as_deref()) {
        (Some(app), Some(model)) => Some(state.models.lookup(app, model)?),
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "app and model query parameters must be given together",
            ));
        }
    };

    let filter = EntryFilter {
        content_type,
        object_pk: query.pk,
    };
    let entries = state.store.log_entries(&filter).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /api/entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<Json<ApiResponse<LogEntry>>, AppError> {
    let entry = state.store.log_entry(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// PATCH /api/entries/{id}/changes
///
/// Replaces the entry's changes with the submitted ones and saves it. Only
/// callers holding the review permission for the entry's model may stage
/// changes; saving the entry then applies them to the audited object.
pub async fn stage_changes(
    State(state): State<AppState>,
    Extension(principal): Extension<RequestUser>,
    Path(id): Path<EntryId>,
    Json(body): Json<StageChangesRequest>,
) -> Result<Json<ApiResponse<LogEntry>>, AppError> {
    let user = principal
        .user()
        .ok_or_else(|| AppError::authentication("Reviewing entries requires authentication"))?;

    let mut entry = state.store.log_entry(id).await?;
    let permission = state
        .config
        .audit
        .review_permission(&entry.content_type.model);
    if !state.binding.permissions.has_perm(user, &permission) {
        return Err(AppError::authorization(format!(
            "Missing permission '{permission}'"
        )));
    }

    entry.changes = body.changes;
    state.store.save(&mut entry).await?;

    info!(
        entry_id = %id,
        model = %entry.content_type,
        pk = %entry.object_pk,
        reviewer = %user.username,
        "Pending changes applied"
    );

    let saved = state.store.log_entry(id).await?;
    Ok(Json(ApiResponse::ok(saved)))
}
