//! Scan records and their closed vocabularies.
//!
//! A [`Scan`] is written once, at the end of a successful ingestion for an
//! authenticated owner, and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, Verdict};

/// Body region a scan image depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanCategory {
    /// Skin lesion or rash imagery.
    Skin,
    /// Eye imagery.
    Eye,
}

/// Raised when a category string is outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scan category must be skin or eye (got {value:?})")]
pub struct UnknownScanCategory {
    /// The rejected input.
    pub value: String,
}

impl ScanCategory {
    /// All categories, in storage order.
    pub const ALL: [Self; 2] = [Self::Skin, Self::Eye];

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skin => "skin",
            Self::Eye => "eye",
        }
    }

    /// Specialist a patient should consult, with its indefinite article.
    pub const fn specialist(self) -> &'static str {
        match self {
            Self::Skin => "a dermatologist",
            Self::Eye => "an ophthalmologist",
        }
    }
}

impl fmt::Display for ScanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanCategory {
    type Err = UnknownScanCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skin" => Ok(Self::Skin),
            "eye" => Ok(Self::Eye),
            other => Err(UnknownScanCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Clinical urgency reported alongside a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine follow-up.
    Low,
    /// Default when the classifier is silent or unclear.
    #[default]
    Medium,
    /// Prompt attention recommended.
    High,
}

impl Severity {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Interpret a free-form label, falling back to [`Severity::Medium`].
    ///
    /// # Examples
    /// ```
    /// use scan_backend::domain::Severity;
    ///
    /// assert_eq!(Severity::from_label(Some(" HIGH ")), Severity::High);
    /// assert_eq!(Severity::from_label(Some("critical")), Severity::Medium);
    /// assert_eq!(Severity::from_label(None), Severity::Medium);
    /// ```
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted classification event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    id: Uuid,
    owner: UserId,
    category: ScanCategory,
    verdict: Verdict,
    image_url: String,
    created_at: DateTime<Utc>,
}

/// Inputs required to build a [`Scan`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanDraft {
    /// Generated identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner: UserId,
    /// Scan category.
    pub category: ScanCategory,
    /// Classification outcome, real or fallback.
    pub verdict: Verdict,
    /// Public URL of the uploaded image.
    pub image_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<ScanDraft> for Scan {
    fn from(draft: ScanDraft) -> Self {
        let ScanDraft {
            id,
            owner,
            category,
            verdict,
            image_url,
            created_at,
        } = draft;
        Self {
            id,
            owner,
            category,
            verdict,
            image_url,
            created_at,
        }
    }
}

impl Scan {
    /// Scan identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Scan category.
    pub fn category(&self) -> ScanCategory {
        self.category
    }

    /// Classification outcome.
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Public URL of the uploaded image.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
