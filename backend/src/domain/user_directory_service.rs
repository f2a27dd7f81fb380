//! Identity resolution and account lookups.
//!
//! The first verified request from a subject creates its user row. Two
//! concurrent first requests race on the store's uniqueness constraint; the
//! loser re-reads the winner's row so both callers see the same id.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    IdentityVerifier, IdentityVerifierError, Registration, UsageStatsRepository,
    UsageStatsRepositoryError, UserDirectory, UserPersistenceError, UserRepository,
};
use crate::domain::{
    BearerToken, DisplayName, Error, ExternalUserId, UsageStatistics, User, UserId,
    VerifiedIdentity,
};

/// User directory backed by the identity verifier and the user store.
#[derive(Clone)]
pub struct UserDirectoryService<U: ?Sized, S: ?Sized> {
    verifier: Arc<dyn IdentityVerifier>,
    users: Arc<U>,
    stats: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<U: ?Sized, S: ?Sized> UserDirectoryService<U, S> {
    /// Create a directory over the given collaborators.
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        users: Arc<U>,
        stats: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            users,
            stats,
            clock,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_stats_error(error: UsageStatsRepositoryError) -> Error {
    match error {
        UsageStatsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("usage statistics unavailable: {message}"))
        }
        UsageStatsRepositoryError::Query { message } => {
            Error::internal(format!("usage statistics error: {message}"))
        }
    }
}

fn map_verifier_error(error: IdentityVerifierError) -> Error {
    match error {
        IdentityVerifierError::Rejected { .. } | IdentityVerifierError::Disabled => {
            Error::unauthorized("Invalid or expired token")
        }
        IdentityVerifierError::Timeout { message }
        | IdentityVerifierError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}

impl<U, S> UserDirectoryService<U, S>
where
    U: UserRepository + ?Sized,
    S: UsageStatsRepository + ?Sized,
{
    async fn lookup(&self, external_id: &ExternalUserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_external_id(external_id)
            .await
            .map_err(map_user_error)
    }

    fn new_user(&self, identity: &VerifiedIdentity) -> User {
        User::new(
            UserId::random(),
            identity.subject_id.clone(),
            DisplayName::or_email_local_part(identity.name.as_deref(), &identity.email),
            identity.email.clone(),
            self.clock.utc(),
        )
    }
}

#[async_trait]
impl<U, S> UserDirectory for UserDirectoryService<U, S>
where
    U: UserRepository + ?Sized,
    S: UsageStatsRepository + ?Sized,
{
    async fn authenticate(&self, token: &BearerToken) -> Result<VerifiedIdentity, Error> {
        self.verifier.verify(token).await.map_err(|err| {
            warn!(error = %err, "credential verification failed");
            map_verifier_error(err)
        })
    }

    async fn resolve_or_create(&self, identity: &VerifiedIdentity) -> Result<Registration, Error> {
        if let Some(user) = self.lookup(&identity.subject_id).await? {
            return Ok(Registration {
                user,
                created: false,
            });
        }

        let candidate = self.new_user(identity);
        let inserted = self
            .users
            .insert_if_absent(&candidate)
            .await
            .map_err(map_user_error)?;
        if inserted {
            info!(user_id = %candidate.id(), subject = %identity.subject_id, "user registered");
            return Ok(Registration {
                user: candidate,
                created: true,
            });
        }

        match self.lookup(&identity.subject_id).await? {
            Some(user) => Ok(Registration {
                user,
                created: false,
            }),
            None => Err(Error::conflict(
                "email address is already registered to another account",
            )),
        }
    }

    async fn find_user(&self, external_id: &ExternalUserId) -> Result<User, Error> {
        self.lookup(external_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn usage_statistics(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<UsageStatistics, Error> {
        let user = self.find_user(external_id).await?;
        let stats = self.stats.find(user.id()).await.map_err(map_stats_error)?;
        Ok(stats.unwrap_or_else(|| UsageStatistics::empty(user.id())))
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
