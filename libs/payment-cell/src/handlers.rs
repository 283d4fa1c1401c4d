use std::sync::Arc;

use axum::{extract::State, Json};

use shared_database::AppContext;
use shared_models::error::AppError;
use shared_models::store::InsertOneResult;

use crate::models::{Payment, PaymentIntentRequest, PaymentIntentResponse};
use crate::services::PaymentService;

#[axum::debug_handler]
pub async fn create_payment_intent(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let response = PaymentService::new(&ctx).create_intent(request.price.as_ref()).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn record_payment(
    State(ctx): State<Arc<AppContext>>,
    Json(payment): Json<Payment>,
) -> Result<Json<InsertOneResult>, AppError> {
    let result = PaymentService::new(&ctx).record_payment(payment).await?;
    Ok(Json(result))
}
