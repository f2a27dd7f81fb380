//! Scan ingestion pipeline.
//!
//! Steps run strictly in order: validate, identify, upload, classify, record.
//! Only validation and upload failures reach the caller. Identity problems
//! demote the request to a guest scan, classifier problems substitute
//! [`Verdict::fallback`], and persistence problems are logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    Classifier, ImageStore, ScanOutcome, ScanRepository, ScanSubmission, ScanSubmissionRequest,
    UsageStatsRepository, UserDirectory,
};
use crate::domain::{
    BearerToken, Error, ImagePolicy, Scan, ScanCategory, ScanDraft, UsageStatsRecorder, User,
    UserId, Verdict,
};

/// Folder used for uploads without a resolved owner.
pub const GUEST_FOLDER: &str = "guest";

/// External services the pipeline talks to before anything is persisted.
#[derive(Clone)]
pub struct ScanCollaborators {
    /// Resolves credentials to users.
    pub directory: Arc<dyn UserDirectory>,
    /// Stores uploaded images.
    pub images: Arc<dyn ImageStore>,
    /// Classifies stored images.
    pub classifier: Arc<dyn Classifier>,
}

/// [`ScanSubmission`] implementation.
#[derive(Clone)]
pub struct ScanIngestionService<R: ?Sized, S: ?Sized> {
    policy: ImagePolicy,
    collaborators: ScanCollaborators,
    scans: Arc<R>,
    stats: UsageStatsRecorder<S>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, S: ?Sized> ScanIngestionService<R, S> {
    /// Assemble the pipeline.
    pub fn new(
        policy: ImagePolicy,
        collaborators: ScanCollaborators,
        scans: Arc<R>,
        stats: UsageStatsRecorder<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            policy,
            collaborators,
            scans,
            stats,
            clock,
        }
    }
}

/// Storage key for an uploaded image.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use scan_backend::domain::{ScanCategory, object_path};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).single().expect("valid time");
/// let path = object_path(ScanCategory::Eye, None, at, "png");
/// assert!(path.starts_with("eye/guest/20250102_030405_"));
/// assert!(path.ends_with(".png"));
/// ```
pub fn object_path(
    category: ScanCategory,
    owner: Option<UserId>,
    at: DateTime<Utc>,
    extension: &str,
) -> String {
    let folder = owner.map_or_else(|| GUEST_FOLDER.to_owned(), |id| id.to_string());
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!(
        "{category}/{folder}/{stamp}_{suffix}.{extension}",
        stamp = at.format("%Y%m%d_%H%M%S"),
    )
}

/// A stored scan and whether its usage statistics were counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Recorded {
    scan_id: Uuid,
    stats_recorded: bool,
}

impl<R, S> ScanIngestionService<R, S>
where
    R: ScanRepository + ?Sized,
    S: UsageStatsRepository + ?Sized,
{
    async fn resolve_owner(&self, token: &BearerToken) -> Option<User> {
        let directory = &self.collaborators.directory;
        let identity = match directory.authenticate(token).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "credential not accepted; continuing as guest");
                return None;
            }
        };
        match directory.resolve_or_create(&identity).await {
            Ok(registration) => Some(registration.user),
            Err(err) => {
                warn!(
                    subject = %identity.subject_id,
                    error = %err,
                    "user resolution failed; continuing as guest"
                );
                None
            }
        }
    }

    async fn classify(&self, image_url: &str, category: ScanCategory) -> Verdict {
        match self.collaborators.classifier.classify(image_url, category).await {
            Ok(raw) => Verdict::from_classifier(raw, category),
            Err(err) => {
                warn!(%category, error = %err, "classifier failed; using fallback verdict");
                Verdict::fallback(category)
            }
        }
    }

    async fn record(&self, owner: UserId, draft: ScanDraft) -> Option<Recorded> {
        let category = draft.category;
        let scan = Scan::from(draft);
        if let Err(err) = self.scans.insert(&scan).await {
            error!(user_id = %owner, scan_id = %scan.id(), error = %err, "scan persistence failed");
            return None;
        }
        // A stats failure never fails the scan; the recorder has logged it.
        let stats_recorded = self.stats.record_scan(owner, category).await;
        Some(Recorded {
            scan_id: scan.id(),
            stats_recorded,
        })
    }
}

#[async_trait]
impl<R, S> ScanSubmission for ScanIngestionService<R, S>
where
    R: ScanRepository + ?Sized,
    S: UsageStatsRepository + ?Sized,
{
    async fn submit(&self, request: ScanSubmissionRequest) -> Result<ScanOutcome, Error> {
        let ScanSubmissionRequest {
            category,
            upload,
            credential,
        } = request;

        let image = self.policy.validate(upload)?;

        let owner = match credential {
            Some(token) => self.resolve_owner(&token).await,
            None => None,
        };
        let owner_id = owner.as_ref().map(User::id);

        let path = object_path(category, owner_id, self.clock.utc(), image.extension());
        let image_url = self
            .collaborators
            .images
            .put(&path, image.bytes(), image.content_type())
            .await
            .map_err(|err| {
                error!(%category, path = %path, error = %err, "image upload failed");
                Error::upstream_failure("Failed to upload image")
            })?;

        let verdict = self.classify(&image_url, category).await;
        let timestamp = self.clock.utc();

        let recorded = match owner_id {
            Some(owner) => {
                let draft = ScanDraft {
                    id: Uuid::new_v4(),
                    owner,
                    category,
                    verdict: verdict.clone(),
                    image_url: image_url.clone(),
                    created_at: timestamp,
                };
                self.record(owner, draft).await
            }
            None => None,
        };
        let scan_id = recorded.map(|recorded| recorded.scan_id);

        info!(
            %category,
            guest = owner_id.is_none(),
            persisted = scan_id.is_some(),
            stats_recorded = recorded.is_some_and(|recorded| recorded.stats_recorded),
            label = %verdict.label,
            "scan processed"
        );

        Ok(ScanOutcome {
            scan_id,
            verdict,
            image_url,
            timestamp,
        })
    }
}

#[cfg(test)]
#[path = "scan_ingestion_service_tests.rs"]
mod tests;
