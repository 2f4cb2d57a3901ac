//! Admin endpoints: patient roster, screening oversight, aggregates.
//!
//! Every handler clears the authorization gate before touching the store.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::authorization::{authorize, Capability};
use crate::db::repository::{screening, user};
use crate::models::{
    DashboardStats, Identity, PatientSummary, RiskLevelStats, ScreeningRecord,
};

/// `GET /admin/patients` — every patient with screening rollups.
pub async fn patients(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    authorize(&identity, Capability::ReadAnyPatientSummary)?;
    let conn = ctx.open_db()?;
    Ok(Json(user::list_patient_summaries(&conn)?))
}

/// `GET /admin/statistics` — aggregate screening figures per risk band.
pub async fn statistics(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<RiskLevelStats>>, ApiError> {
    authorize(&identity, Capability::ReadAnyPatientSummary)?;
    let conn = ctx.open_db()?;
    Ok(Json(screening::risk_level_statistics(&conn)?))
}

/// `GET /admin/patient/:id/screenings` — one patient's full history.
pub async fn patient_screenings(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ScreeningRecord>>, ApiError> {
    authorize(&identity, Capability::ReadAnyScreening)?;

    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid patient id".into()))?;

    let conn = ctx.open_db()?;
    if !user::patient_exists(&conn, &id)? {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    Ok(Json(screening::list_by_user(&conn, &id)?))
}

/// `GET /admin/high-risk-screenings` — High-band screenings from the
/// last 30 days, newest first.
pub async fn high_risk_screenings(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ScreeningRecord>>, ApiError> {
    authorize(&identity, Capability::ReadAnyScreening)?;
    let conn = ctx.open_db()?;
    Ok(Json(screening::recent_high_risk(&conn, ctx.clock.now())?))
}

/// `GET /admin/dashboard-stats` — headline counts for the admin landing page.
pub async fn dashboard_stats(
    State(ctx): State<ApiContext>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<DashboardStats>, ApiError> {
    authorize(&identity, Capability::ReadAnyPatientSummary)?;
    let conn = ctx.open_db()?;
    Ok(Json(screening::dashboard_stats(&conn, ctx.clock.now())?))
}
