use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use models::CourierRecord;
use uuid::Uuid;

use crate::{errors::ApiError, state::AppState};

#[utoipa::path(
    get, path = "/api/couriers", tag = "couriers",
    responses((status = 200, description = "All courier records, oldest first", body = [crate::openapi::CourierRecordDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Json<Vec<CourierRecord>> {
    Json(state.couriers.list().await)
}

#[utoipa::path(
    get, path = "/api/couriers/{id}", tag = "couriers",
    params(("id" = Uuid, Path, description = "Courier ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CourierRecordDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CourierRecord>, ApiError> {
    let Path(id) = id.map_err(|rej| ApiError::BadRequest(rej.body_text()))?;
    let record = state.couriers.get(id).await?;
    Ok(Json(record))
}
