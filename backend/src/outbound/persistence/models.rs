//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next
//! to the rows so each repository only deals with mapping errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    DisplayName, EmailAddress, ExternalUserId, Scan, ScanCategory, ScanDraft, Severity,
    UsageStatistics, User, UserId, UserValidationError, Verdict,
};

use super::schema::{scans, user_stats, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, UserValidationError> {
        Ok(User::new(
            UserId::from_uuid(self.id),
            ExternalUserId::new(self.external_id)?,
            DisplayName::new(self.display_name)?,
            EmailAddress::new(self.email)?,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub external_id: &'a str,
    pub display_name: &'a str,
    pub email: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            external_id: user.external_id().as_str(),
            display_name: user.display_name().as_ref(),
            email: user.email().as_str(),
            created_at: user.created_at(),
        }
    }
}

/// Row struct for reading from the scans table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScanRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub category: String,
    pub label: String,
    pub confidence: f64,
    pub severity: String,
    pub description: String,
    pub recommendations: serde_json::Value,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Reasons a stored scan row cannot be rehydrated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ScanRowError {
    #[error("scan {0} has no owner")]
    Unowned(Uuid),
    #[error("scan {id} has unknown category {category:?}")]
    Category { id: Uuid, category: String },
}

impl ScanRow {
    pub(crate) fn into_domain(self) -> Result<Scan, ScanRowError> {
        let owner = self.user_id.ok_or(ScanRowError::Unowned(self.id))?;
        let category: ScanCategory = self.category.parse().map_err(|_| ScanRowError::Category {
            id: self.id,
            category: self.category.clone(),
        })?;
        let recommendations = serde_json::from_value::<Vec<String>>(self.recommendations)
            .unwrap_or_else(|error| {
                warn!(scan_id = %self.id, %error, "unreadable recommendations, using none");
                Vec::new()
            });

        Ok(Scan::from(ScanDraft {
            id: self.id,
            owner: UserId::from_uuid(owner),
            category,
            verdict: Verdict {
                label: self.label,
                confidence: self.confidence,
                severity: Severity::from_label(Some(&self.severity)),
                description: self.description,
                recommendations,
            },
            image_url: self.image_url,
            created_at: self.created_at,
        }))
    }
}

/// Insertable struct for creating new scan records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scans)]
pub(crate) struct NewScanRow<'a> {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub category: &'a str,
    pub label: &'a str,
    pub confidence: f64,
    pub severity: &'a str,
    pub description: &'a str,
    pub recommendations: serde_json::Value,
    pub image_url: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Scan> for NewScanRow<'a> {
    fn from(scan: &'a Scan) -> Self {
        let verdict = scan.verdict();
        Self {
            id: scan.id(),
            user_id: Some(*scan.owner().as_uuid()),
            category: scan.category().as_str(),
            label: &verdict.label,
            confidence: verdict.confidence,
            severity: verdict.severity.as_str(),
            description: &verdict.description,
            recommendations: serde_json::Value::from(verdict.recommendations.clone()),
            image_url: scan.image_url(),
            created_at: scan.created_at(),
        }
    }
}

/// Row struct for reading from the user_stats table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserStatsRow {
    pub user_id: Uuid,
    pub total_scans: i32,
    pub skin_scans: i32,
    pub eye_scans: i32,
    pub last_scan_at: Option<DateTime<Utc>>,
}

fn counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

impl From<UserStatsRow> for UsageStatistics {
    fn from(row: UserStatsRow) -> Self {
        Self::from_counts(
            UserId::from_uuid(row.user_id),
            counter(row.total_scans),
            counter(row.skin_scans),
            counter(row.eye_scans),
            row.last_scan_at,
        )
    }
}

/// Insertable first-scan row for the stats upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_stats)]
pub(crate) struct NewUserStatsRow {
    pub user_id: Uuid,
    pub total_scans: i32,
    pub skin_scans: i32,
    pub eye_scans: i32,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl NewUserStatsRow {
    pub(crate) fn first_scan(user: UserId, category: ScanCategory, at: DateTime<Utc>) -> Self {
        let (skin_scans, eye_scans) = match category {
            ScanCategory::Skin => (1, 0),
            ScanCategory::Eye => (0, 1),
        };
        Self {
            user_id: *user.as_uuid(),
            total_scans: 1,
            skin_scans,
            eye_scans,
            last_scan_at: Some(at),
            updated_at: at,
        }
    }
}
