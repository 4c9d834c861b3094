use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::application::interfaces::clock::{Clock, SystemClock};
use crate::application::usecases::{
    plan_status::PlanStatusUseCase, subscriptions::SubscriptionUseCase,
};
use crate::auth::AuthUser;
use crate::domain::{
    repositories::{
        payments::PaymentRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::subscriptions::{BindSubscriptionRequest, CancelSubscriptionRequest},
};
use crate::infrastructure::axum_http::error_responses;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        payments::PaymentPostgres, plans::PlanPostgres, subscriptions::SubscriptionPostgres,
        users::UserPostgres,
    },
};
use crate::observability::audit::AuditTrail;

pub fn routes(db_pool: Arc<PgPoolSquad>, audit: AuditTrail) -> Router {
    let clock = Arc::new(SystemClock);

    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&clock),
        audit,
    );

    let plan_status_usecase = PlanStatusUseCase::new(
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
        clock,
    );

    Router::new()
        .route("/bind", post(bind))
        .route("/current", get(get_current_subscription))
        .route("/cancel", post(cancel))
        .with_state(Arc::new(subscription_usecase))
        .merge(
            Router::new()
                .route("/status", get(get_status))
                .with_state(Arc::new(plan_status_usecase)),
        )
}

pub async fn bind<U, P, S, Clk>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, P, S, Clk>>>,
    _auth: AuthUser,
    Json(bind_request): Json<BindSubscriptionRequest>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    match subscription_usecase
        .bind(bind_request.user_id, bind_request.plan_id)
        .await
    {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}

pub async fn get_current_subscription<U, P, S, Clk>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, P, S, Clk>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    match subscription_usecase
        .get_current_subscription(auth.user_id)
        .await
    {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}

pub async fn cancel<U, P, S, Clk>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, P, S, Clk>>>,
    auth: AuthUser,
    Json(cancel_request): Json<CancelSubscriptionRequest>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    match subscription_usecase
        .cancel(auth.user_id, cancel_request.reason)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "subscription canceled" })),
        )
            .into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}

pub async fn get_status<S, P, Pay, Clk>(
    State(plan_status_usecase): State<Arc<PlanStatusUseCase<S, P, Pay, Clk>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    match plan_status_usecase.get_status(auth.user_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}
