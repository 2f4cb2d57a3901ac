//! Patient-facing screening endpoints: run a screening, browse history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::authorization::{authorize, AuthError, Capability};
use crate::db::repository::screening;
use crate::models::{Identity, ScreeningInput, ScreeningRecord, ScreeningSummary};
use crate::screening::run_screening;

/// `POST /screening/predict` — run the full pipeline and persist the record.
///
/// The scoring call uses a blocking HTTP client, so the whole pipeline
/// moves off the async runtime.
pub async fn predict(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<ScreeningInput>,
) -> Result<(StatusCode, Json<ScreeningRecord>), ApiError> {
    authorize(&identity, Capability::CreateOwnScreening)?;

    let record = tokio::task::spawn_blocking(move || -> Result<ScreeningRecord, ApiError> {
        let conn = ctx.open_db()?;
        let record = run_screening(
            &conn,
            ctx.predictor.as_ref(),
            ctx.clock.as_ref(),
            &identity,
            &input,
        )?;
        Ok(record)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("screening task failed: {e}")))??;

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /screening/history` — the caller's own screenings, newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ScreeningSummary>>, ApiError> {
    authorize(&identity, Capability::ReadOwnScreening { owner: identity.id })?;
    let conn = ctx.open_db()?;
    let summaries = screening::list_summaries_by_user(&conn, &identity.id)?;
    Ok(Json(summaries))
}

/// `GET /screening/:id` — one screening in full.
///
/// A record owned by someone else answers 404, same as a record that
/// does not exist, so ids cannot be probed for existence.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<ScreeningRecord>, ApiError> {
    authorize(&identity, Capability::ReadOwnScreening { owner: identity.id })?;

    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid screening id".into()))?;

    let conn = ctx.open_db()?;
    let record = screening::get_by_id(&conn, &id, None)?
        .ok_or_else(|| ApiError::NotFound("Screening not found".into()))?;

    match authorize(&identity, Capability::ReadOwnScreening { owner: record.user_id }) {
        Ok(()) => Ok(Json(record)),
        Err(AuthError::Forbidden) => Err(ApiError::NotFound("Screening not found".into())),
        Err(err) => Err(err.into()),
    }
}
