//! Classification outcomes.
//!
//! A [`Verdict`] either comes from the external classifier (normalised by
//! [`Verdict::from_classifier`]) or is the deterministic
//! [`Verdict::fallback`] substituted when the classifier cannot be used.
//! Confidence is carried exactly as produced; the classifier may report a
//! fraction while the fallback reports a percentage.

use serde::{Deserialize, Serialize};

use super::ports::ClassifierVerdict;
use super::{ScanCategory, Severity};

/// Label used when the classifier returns a blank one.
pub const UNKNOWN_LABEL: &str = "Unknown Condition";

/// Confidence reported by [`Verdict::fallback`], on a percentage scale.
pub const FALLBACK_CONFIDENCE: f64 = 75.0;

/// Outcome of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Classified condition name.
    pub label: String,
    /// Producer-defined confidence; never rescaled.
    pub confidence: f64,
    /// Clinical urgency.
    pub severity: Severity,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Ordered advice for the patient.
    pub recommendations: Vec<String>,
}

impl Verdict {
    /// Normalise a raw classifier reply, filling the documented defaults.
    pub fn from_classifier(raw: ClassifierVerdict, category: ScanCategory) -> Self {
        let ClassifierVerdict {
            label,
            confidence,
            severity,
            description,
            recommendations,
        } = raw;

        let label = match label.trim() {
            "" => UNKNOWN_LABEL.to_owned(),
            trimmed => trimmed.to_owned(),
        };
        let recommendations = recommendations
            .filter(|items| !items.is_empty())
            .unwrap_or_else(|| vec![format!("Consult {}", category.specialist())]);

        Self {
            label,
            confidence,
            severity: Severity::from_label(severity.as_deref()),
            description: description.unwrap_or_default(),
            recommendations,
        }
    }

    /// Deterministic verdict used when the classifier fails.
    ///
    /// # Examples
    /// ```
    /// use scan_backend::domain::{ScanCategory, Severity, Verdict};
    ///
    /// let verdict = Verdict::fallback(ScanCategory::Eye);
    /// assert_eq!(verdict.label, "Eye Condition Detected");
    /// assert_eq!(verdict.severity, Severity::Medium);
    /// assert_eq!(verdict.recommendations.len(), 4);
    /// ```
    pub fn fallback(category: ScanCategory) -> Self {
        let (region, care_tip) = match category {
            ScanCategory::Skin => ("Skin", "Keep the affected area clean and dry"),
            ScanCategory::Eye => ("Eye", "Avoid rubbing or touching the eyes"),
        };
        Self {
            label: format!("{region} Condition Detected"),
            confidence: FALLBACK_CONFIDENCE,
            severity: Severity::Medium,
            description: format!(
                "Visual analysis of {category} image completed. Professional medical \
                 consultation recommended for proper diagnosis and treatment plan."
            ),
            recommendations: vec![
                format!("Consult {} for accurate diagnosis", category.specialist()),
                "Monitor the condition for any changes".to_owned(),
                "Maintain good hygiene practices".to_owned(),
                care_tip.to_owned(),
            ],
        }
    }
}
