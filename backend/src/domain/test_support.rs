//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    DisplayName, EmailAddress, ExternalUserId, User, UserId, VerifiedIdentity,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, 8, 45, 12)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn verified_identity(subject: &str, email: &str, name: Option<&str>) -> VerifiedIdentity {
    VerifiedIdentity {
        subject_id: ExternalUserId::new(subject).expect("valid subject"),
        email: EmailAddress::new(email).expect("valid email"),
        name: name.map(str::to_owned),
    }
}

pub(crate) fn stored_user(subject: &str, email: &str) -> User {
    let email = EmailAddress::new(email).expect("valid email");
    User::new(
        UserId::random(),
        ExternalUserId::new(subject).expect("valid subject"),
        DisplayName::or_email_local_part(None, &email),
        email,
        fixture_timestamp(),
    )
}
