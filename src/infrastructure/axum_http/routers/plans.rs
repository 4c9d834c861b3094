use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::application::usecases::plan_catalog::PlanCatalogUseCase;
use crate::auth::AuthUser;
use crate::domain::{
    repositories::plans::PlanRepository,
    value_objects::enums::plan_tiers::PlanTier,
    value_objects::plans::{CreatePlanRequest, CreatePlanResponse},
};
use crate::infrastructure::axum_http::error_responses::{self, ErrorResponse};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let plan_catalog_usecase = PlanCatalogUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", get(list_plans))
        .route("/", post(create_plan))
        .route("/:plan_id", get(get_plan))
        .route("/tier/:tier", get(get_plan_by_tier))
        .with_state(Arc::new(plan_catalog_usecase))
}

pub async fn list_plans<P>(
    State(plan_catalog_usecase): State<Arc<PlanCatalogUseCase<P>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match plan_catalog_usecase.list_plans().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}

pub async fn get_plan<P>(
    State(plan_catalog_usecase): State<Arc<PlanCatalogUseCase<P>>>,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match plan_catalog_usecase.get_plan(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}

pub async fn get_plan_by_tier<P>(
    State(plan_catalog_usecase): State<Arc<PlanCatalogUseCase<P>>>,
    Path(tier): Path<String>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    let Some(tier) = PlanTier::from_str(&tier) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                code: StatusCode::BAD_REQUEST.as_u16(),
                message: format!("unknown plan tier: {tier}"),
            }),
        )
            .into_response();
    };

    match plan_catalog_usecase.get_plan_by_tier(tier).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}

pub async fn create_plan<P>(
    State(plan_catalog_usecase): State<Arc<PlanCatalogUseCase<P>>>,
    auth: AuthUser,
    Json(create_plan_request): Json<CreatePlanRequest>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                code: StatusCode::UNAUTHORIZED.as_u16(),
                message: "Unauthorized".to_string(),
            }),
        )
            .into_response();
    }

    match plan_catalog_usecase.create_plan(create_plan_request).await {
        Ok(plan_id) => (StatusCode::CREATED, Json(CreatePlanResponse { id: plan_id })).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}
