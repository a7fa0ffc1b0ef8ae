//! Audited record handlers.

use axum::Json;
use axum::extract::{Path, State};

use auditbind_core::error::{AppError, ErrorKind};
use auditbind_entity::Record;
use auditbind_store::ObjectStore;

use crate::dto::request::UpsertRecordRequest;
use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/records/{app}/{model}/{pk}
pub async fn get_record(
    State(state): State<AppState>,
    Path((app, model, pk)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<Record>>, AppError> {
    let kind = state.models.lookup(&app, &model)?;
    let record = state.store.get(&kind, &pk).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// PUT /api/records/{app}/{model}/{pk}
///
/// Creates the record or merges the given fields into it, then saves it.
pub async fn put_record(
    State(state): State<AppState>,
    Path((app, model, pk)): Path<(String, String, String)>,
    Json(body): Json<UpsertRecordRequest>,
) -> Result<Json<ApiResponse<Record>>, AppError> {
    let kind = state.models.lookup(&app, &model)?;
    let mut record = match state.store.get(&kind, &pk).await {
        Ok(record) => record,
        Err(e) if e.kind == ErrorKind::NotFound => Record::new(kind.clone(), pk.clone()),
        Err(e) => return Err(e),
    };

    for (name, value) in body.fields {
        record.set_attr(&name, value);
    }
    state.store.save(&mut record).await?;

    let saved = state.store.get(&kind, &pk).await?;
    Ok(Json(ApiResponse::ok(saved)))
}

/// DELETE /api/records/{app}/{model}/{pk}
pub async fn delete_record(
    State(state): State<AppState>,
    Path((app, model, pk)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<Record>>, AppError> {
    let kind = state.models.lookup(&app, &model)?;
    let record = state.store.delete(&kind, &pk).await?;
    Ok(Json(ApiResponse::ok(record)))
}
