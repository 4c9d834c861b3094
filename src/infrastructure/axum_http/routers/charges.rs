use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use crate::application::interfaces::{
    clock::{Clock, SystemClock},
    code_source::{CodeSource, RandomCodeSource},
};
use crate::application::usecases::charges::ChargeUseCase;
use crate::auth::AuthUser;
use crate::domain::{
    repositories::{
        charges::ChargeRepository, payments::PaymentRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::charges::GenerateChargeRequest,
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
    let charge_usecase = ChargeUseCase::new(
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(ChargePostgres::new(Arc::clone(&db_pool))),
        Arc::new(SystemClock),
        Arc::new(RandomCodeSource),
        audit,
    );

    Router::new()
        .route("/", post(generate))
        .with_state(Arc::new(charge_usecase))
}

pub async fn generate<S, P, Pay, C, Clk, Code>(
    State(charge_usecase): State<Arc<ChargeUseCase<S, P, Pay, C, Clk, Code>>>,
    auth: AuthUser,
    Json(generate_request): Json<GenerateChargeRequest>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    C: ChargeRepository + Send + Sync + 'static,
    Clk: Clock + 'static,
    Code: CodeSource + 'static,
{
    match charge_usecase.generate(auth.user_id, generate_request).await {
        Ok(charge) => (StatusCode::CREATED, Json(charge)).into_response(),
        Err(err) => error_responses::respond(err.status_code(), &err),
    }
}
