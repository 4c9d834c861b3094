use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::payments::{NewPaymentEntity, PaymentEntity},
    repositories::payments::PaymentRepository,
    value_objects::enums::{charge_statuses::ChargeStatus, payment_statuses::PaymentStatus},
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{charges, payments},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn find_latest_approved(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .filter(payments::subscription_id.eq(subscription_id))
            .filter(payments::status.eq(PaymentStatus::Approved.to_string()))
            .order(payments::paid_at.desc())
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn record_payment(&self, payment: NewPaymentEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(payments::table)
            .values(&payment)
            .returning(payments::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn record_payment_settling_charge(
        &self,
        payment: NewPaymentEntity,
        charge_id: Uuid,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment_id = conn.transaction::<Uuid, anyhow::Error, _>(|conn| {
            let payment_id = insert_into(payments::table)
                .values(&payment)
                .returning(payments::id)
                .get_result::<Uuid>(conn)?;

            update(charges::table)
                .filter(charges::id.eq(charge_id))
                .set((
                    charges::status.eq(ChargeStatus::Paid.to_string()),
                    charges::payment_id.eq(Some(payment_id)),
                ))
                .execute(conn)?;

            Ok(payment_id)
        })?;

        Ok(payment_id)
    }
}
