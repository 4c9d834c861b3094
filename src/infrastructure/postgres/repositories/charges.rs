use anyhow::Result;
use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::charges::{ChargeEntity, InsertChargeEntity},
    repositories::charges::ChargeRepository,
    value_objects::charges::ChargeInsertOutcome,
    value_objects::enums::charge_statuses::ChargeStatus,
};
use crate::infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::charges};

pub struct ChargePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ChargePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ChargeRepository for ChargePostgres {
    async fn insert_pending(&self, charge: InsertChargeEntity) -> Result<ChargeInsertOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(charges::table)
            .values(&charge)
            .returning(charges::id)
            .get_result::<Uuid>(&mut conn);

        match inserted {
            Ok(id) => Ok(ChargeInsertOutcome::Created(id)),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Ok(ChargeInsertOutcome::CodeTaken)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_pending_by_code(
        &self,
        subscription_id: Uuid,
        code: &str,
    ) -> Result<Option<ChargeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let charge = charges::table
            .filter(charges::subscription_id.eq(subscription_id))
            .filter(charges::code.eq(code))
            .filter(charges::status.eq(ChargeStatus::Pending.to_string()))
            .select(ChargeEntity::as_select())
            .first::<ChargeEntity>(&mut conn)
            .optional()?;

        Ok(charge)
    }

    async fn find_latest_pending(&self, subscription_id: Uuid) -> Result<Option<ChargeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let charge = charges::table
            .filter(charges::subscription_id.eq(subscription_id))
            .filter(charges::status.eq(ChargeStatus::Pending.to_string()))
            .order(charges::created_at.desc())
            .select(ChargeEntity::as_select())
            .first::<ChargeEntity>(&mut conn)
            .optional()?;

        Ok(charge)
    }
}
