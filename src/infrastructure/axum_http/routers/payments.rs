use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use crate::application::interfaces::clock::{Clock, SystemClock};
use crate::application::usecases::payments::PaymentUseCase;
use crate::auth::AuthUser;
use crate::domain::{
    repositories::{
        charges::ChargeRepository, payments::PaymentRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::payments::RegisterPaymentRequest,
};
use crate::infrastructure::axum_http::error_responses;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{
        charges::ChargePostgres, payments::PaymentPostgres, plans::PlanPostgres,
        subscriptions::SubscriptionPostgres,
    },
};
use crate::observability::audit::AuditTrail;

pub fn routes(db_pool: Arc<PgPoolSquad>, audit: AuditTrail) -> Router {
    let payment_usecase = PaymentUseCase::new(
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(ChargePostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SystemClock),
        audit,
    );

    Router::new()
        .route("/", post(register))
        .with_state(Arc::new(payment_usecase))
}

pub async fn register<S, P, C, Pay, Clk>(
    State(payment_usecase): State<Arc<PaymentUseCase<S, P, C, Pay, Clk>>>,
    auth: AuthUser,
    Json(register_request): Json<RegisterPaymentRequest>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ChargeRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
{
    match payment_usecase.register(auth.user_id, register_request).await {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}
