use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Period, Routine, ScanOverride, UserProfile},
    routes::AppState,
    services::{assembler, RoutineAssembler},
};

#[derive(Debug, Deserialize)]
pub struct GenerateRoutineRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub scan_override: Option<ScanOverride>,
}

#[derive(Debug, Serialize)]
pub struct RoutineResponse {
    pub routine: Routine,
    /// How far the routine runs over the profile's monthly budget, in
    /// rupees. Zero when it fits; an overage is data, never a failure.
    pub budget_overage: i64,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub routine: Routine,
    pub period: Period,
    pub slot_index: usize,
    pub product_id: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StepCompletionRequest {
    pub routine: Routine,
    pub period: Period,
    pub slot_index: usize,
    pub completed: bool,
}

/// Handler for routine generation
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GenerateRoutineRequest>,
) -> AppResult<Json<RoutineResponse>> {
    tracing::info!(
        request_id = %request_id,
        budget = request.profile.monthly_budget,
        concern_count = request.profile.concerns.len(),
        has_scan_override = request.scan_override.is_some(),
        "Processing routine generation request"
    );

    let locale = effective_locale(&state, &request.profile.locale);
    let products = state.catalog.products(&locale).await?;

    let routine =
        RoutineAssembler::new(&products, &request.profile, request.scan_override.as_ref())
            .assemble();
    let budget_overage = routine.budget_overage(request.profile.monthly_budget);

    tracing::info!(
        request_id = %request_id,
        total_cost = routine.total_cost,
        budget_overage,
        "Routine generation completed"
    );

    Ok(Json(RoutineResponse {
        routine,
        budget_overage,
    }))
}

/// Handler for swapping one slot's product.
///
/// No budget re-validation happens here: the user has explicitly overridden
/// the choice, so only total-cost consistency is maintained.
pub async fn swap(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SwapRequest>,
) -> AppResult<Json<Routine>> {
    let locale = effective_locale(&state, request.locale.as_deref().unwrap_or(""));
    let product = state.catalog.find_product(&locale, &request.product_id).await?;

    tracing::info!(
        request_id = %request_id,
        period = %request.period,
        slot_index = request.slot_index,
        product_id = %request.product_id,
        "Swapping routine product"
    );

    let updated = assembler::swap(&request.routine, request.period, request.slot_index, product)?;
    Ok(Json(updated))
}

/// Handler for updating one step's completion flag
pub async fn set_step_completion(
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<StepCompletionRequest>,
) -> AppResult<Json<Routine>> {
    tracing::debug!(
        request_id = %request_id,
        period = %request.period,
        slot_index = request.slot_index,
        completed = request.completed,
        "Updating step completion"
    );

    let updated = assembler::set_completed(
        &request.routine,
        request.period,
        request.slot_index,
        request.completed,
    )?;
    Ok(Json(updated))
}

fn effective_locale(state: &AppState, requested: &str) -> String {
    if requested.is_empty() {
        state.default_locale.clone()
    } else {
        requested.to_string()
    }
}
