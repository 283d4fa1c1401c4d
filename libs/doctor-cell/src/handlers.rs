use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use shared_database::AppContext;
use shared_models::error::AppError;
use shared_models::store::{DeleteResult, InsertOneResult};

use crate::models::Doctor;
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn list_doctors(State(ctx): State<Arc<AppContext>>) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = DoctorService::new(&ctx).list_doctors().await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn add_doctor(
    State(ctx): State<Arc<AppContext>>,
    Json(doctor): Json<Doctor>,
) -> Result<Json<InsertOneResult>, AppError> {
    let result = DoctorService::new(&ctx).add_doctor(doctor).await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn remove_doctor(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let result = DoctorService::new(&ctx).remove_doctor(&id).await?;
    Ok(Json(result))
}
