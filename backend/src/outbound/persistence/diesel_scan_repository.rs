//! PostgreSQL-backed `ScanRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ScanListing, ScanRepository, ScanRepositoryError};
use crate::domain::{Scan, ScanCategory, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewScanRow, ScanRow};
use super::pool::DbPool;
use super::schema::scans;

/// Diesel-backed implementation of the `ScanRepository` port.
#[derive(Clone)]
pub struct DieselScanRepository {
    pool: DbPool,
}

impl DieselScanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Scans owned by `owner`, optionally limited to one category.
fn owned_by(owner: UserId, category: Option<ScanCategory>) -> scans::BoxedQuery<'static, Pg> {
    let query = scans::table
        .filter(scans::user_id.eq(*owner.as_uuid()))
        .into_boxed();
    match category {
        Some(category) => query.filter(scans::category.eq(category.as_str())),
        None => query,
    }
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// One history page, newest first with ties broken by id.
fn history_page(
    owner: UserId,
    category: Option<ScanCategory>,
    page: PageRequest,
) -> scans::BoxedQuery<'static, Pg> {
    owned_by(owner, category)
        .order((scans::created_at.desc(), scans::id.desc()))
        .limit(to_sql_count(page.limit()))
        .offset(to_sql_count(page.offset()))
}

#[async_trait]
impl ScanRepository for DieselScanRepository {
    async fn insert(&self, scan: &Scan) -> Result<(), ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(scans::table)
            .values(NewScanRow::from(scan))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
        category: Option<ScanCategory>,
        page: PageRequest,
    ) -> Result<ScanListing, ScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = owned_by(owner, category)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<ScanRow> = history_page(owner, category, page)
            .select(ScanRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let scans = rows
            .into_iter()
            .map(|row| {
                row.into_domain()
                    .map_err(|err| ScanRepositoryError::query(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScanListing {
            scans,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
