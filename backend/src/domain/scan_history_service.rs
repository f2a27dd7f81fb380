//! Paginated scan history for the owning user.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;

use crate::domain::ports::{
    ScanHistoryQuery, ScanHistoryRequest, ScanRepository, ScanRepositoryError, UserRepository,
};
use crate::domain::user_directory_service::map_user_error;
use crate::domain::{Error, Scan};

/// History query backed by the user and scan stores.
#[derive(Clone)]
pub struct ScanHistoryService<U: ?Sized, R: ?Sized> {
    users: Arc<U>,
    scans: Arc<R>,
}

impl<U: ?Sized, R: ?Sized> ScanHistoryService<U, R> {
    /// Create a history query over the given stores.
    pub fn new(users: Arc<U>, scans: Arc<R>) -> Self {
        Self { users, scans }
    }
}

fn map_scan_error(error: ScanRepositoryError) -> Error {
    match error {
        ScanRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("scan repository unavailable: {message}"))
        }
        ScanRepositoryError::Query { message } => {
            Error::internal(format!("scan repository error: {message}"))
        }
    }
}

#[async_trait]
impl<U, R> ScanHistoryQuery for ScanHistoryService<U, R>
where
    U: UserRepository + ?Sized,
    R: ScanRepository + ?Sized,
{
    async fn list_scans(&self, request: ScanHistoryRequest) -> Result<Page<Scan>, Error> {
        let ScanHistoryRequest {
            requester,
            owner,
            category,
            page,
        } = request;

        if requester != owner {
            return Err(Error::forbidden("Unauthorized access"));
        }

        let user = self
            .users
            .find_by_external_id(&owner)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let listing = self
            .scans
            .list_for_owner(user.id(), category, page)
            .await
            .map_err(map_scan_error)?;

        Ok(Page::new(listing.scans, listing.total, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockScanRepository, MockUserRepository, ScanListing};
    use crate::domain::test_support::{fixture_timestamp, stored_user};
    use crate::domain::{ErrorCode, ExternalUserId, ScanCategory, ScanDraft, UserId, Verdict};
    use mockall::predicate::eq;
    use pagination::PageRequest;
    use rstest::rstest;
    use uuid::Uuid;

    fn subject(raw: &str) -> ExternalUserId {
        ExternalUserId::new(raw).expect("valid subject")
    }

    fn request(requester: &str, owner: &str, page: PageRequest) -> ScanHistoryRequest {
        ScanHistoryRequest {
            requester: subject(requester),
            owner: subject(owner),
            category: None,
            page,
        }
    }

    fn scan_for(owner: UserId) -> Scan {
        Scan::from(ScanDraft {
            id: Uuid::new_v4(),
            owner,
            category: ScanCategory::Skin,
            verdict: Verdict::fallback(ScanCategory::Skin),
            image_url: "https://cdn.example/skin.png".to_owned(),
            created_at: fixture_timestamp(),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_other_users_history() {
        let service = ScanHistoryService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockScanRepository::new()),
        );

        let error = service
            .list_scans(request("alice", "bob", PageRequest::default()))
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_owner_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_external_id()
            .times(1)
            .return_once(|_| Ok(None));
        let service = ScanHistoryService::new(Arc::new(users), Arc::new(MockScanRepository::new()));

        let error = service
            .list_scans(request("ghost", "ghost", PageRequest::default()))
            .await
            .expect_err("not found");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn page_beyond_range_is_empty_but_reports_totals() {
        let owner = stored_user("carol", "carol@example.com");
        let owner_id = owner.id();
        let page = PageRequest::new(Some(3), Some(10)).expect("valid page");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_external_id()
            .times(1)
            .return_once(move |_| Ok(Some(owner)));
        let mut scans = MockScanRepository::new();
        scans
            .expect_list_for_owner()
            .with(eq(owner_id), eq(None), eq(page))
            .times(1)
            .return_once(|_, _, _| {
                Ok(ScanListing {
                    scans: Vec::new(),
                    total: 5,
                })
            });
        let service = ScanHistoryService::new(Arc::new(users), Arc::new(scans));

        let result = service
            .list_scans(request("carol", "carol", page))
            .await
            .expect("history page");

        assert!(result.items().is_empty());
        assert_eq!(result.total(), 5);
        assert_eq!(result.total_pages(), 1);
        assert_eq!(result.page(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn category_filter_is_forwarded() {
        let owner = stored_user("dave", "dave@example.com");
        let owner_id = owner.id();
        let stored = scan_for(owner_id);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_external_id()
            .times(1)
            .return_once(move |_| Ok(Some(owner)));
        let mut scans = MockScanRepository::new();
        scans
            .expect_list_for_owner()
            .with(eq(owner_id), eq(Some(ScanCategory::Skin)), eq(PageRequest::default()))
            .times(1)
            .return_once(move |_, _, _| {
                Ok(ScanListing {
                    scans: vec![stored],
                    total: 1,
                })
            });
        let service = ScanHistoryService::new(Arc::new(users), Arc::new(scans));
        let mut history = request("dave", "dave", PageRequest::default());
        history.category = Some(ScanCategory::Skin);

        let result = service.list_scans(history).await.expect("history page");

        assert_eq!(result.items().len(), 1);
        assert_eq!(result.total_pages(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn scan_store_outage_is_service_unavailable() {
        let owner = stored_user("erin", "erin@example.com");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_external_id()
            .times(1)
            .return_once(move |_| Ok(Some(owner)));
        let mut scans = MockScanRepository::new();
        scans
            .expect_list_for_owner()
            .times(1)
            .return_once(|_, _, _| Err(ScanRepositoryError::connection("timeout")));
        let service = ScanHistoryService::new(Arc::new(users), Arc::new(scans));

        let error = service
            .list_scans(request("erin", "erin", PageRequest::default()))
            .await
            .expect_err("outage");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
