//! PostgreSQL-backed `UsageStatsRepository` implementation using Diesel ORM.
//!
//! Recording a scan is one `INSERT ... ON CONFLICT (user_id) DO UPDATE`
//! statement. The inserted row carries the per-scan increments, and the
//! conflict branch adds the `excluded` values to the stored counters, so
//! concurrent scans for one user never lose an update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::{QueryFragment, QueryId};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UsageStatsRepository, UsageStatsRepositoryError};
use crate::domain::{ScanCategory, UsageStatistics, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserStatsRow, UserStatsRow};
use super::pool::DbPool;
use super::schema::user_stats;

/// Diesel-backed implementation of the `UsageStatsRepository` port.
#[derive(Clone)]
pub struct DieselUsageStatsRepository {
    pool: DbPool,
}

impl DieselUsageStatsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Upsert adding one scan to the stored counters.
fn record_scan_statement(row: NewUserStatsRow) -> impl QueryFragment<Pg> + QueryId + Send {
    diesel::insert_into(user_stats::table)
        .values(row)
        .on_conflict(user_stats::user_id)
        .do_update()
        .set((
            user_stats::total_scans.eq(user_stats::total_scans + excluded(user_stats::total_scans)),
            user_stats::skin_scans.eq(user_stats::skin_scans + excluded(user_stats::skin_scans)),
            user_stats::eye_scans.eq(user_stats::eye_scans + excluded(user_stats::eye_scans)),
            user_stats::last_scan_at.eq(excluded(user_stats::last_scan_at)),
            user_stats::updated_at.eq(excluded(user_stats::updated_at)),
        ))
}

#[async_trait]
impl UsageStatsRepository for DieselUsageStatsRepository {
    async fn record_scan(
        &self,
        user: UserId,
        category: ScanCategory,
        at: DateTime<Utc>,
    ) -> Result<(), UsageStatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        record_scan_statement(NewUserStatsRow::first_scan(user, category, at))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, user: UserId) -> Result<Option<UsageStatistics>, UsageStatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserStatsRow> = user_stats::table
            .filter(user_stats::user_id.eq(*user.as_uuid()))
            .select(UserStatsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(UsageStatistics::from))
    }
}
