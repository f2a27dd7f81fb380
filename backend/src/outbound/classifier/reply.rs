//! Interpretation of the model's free-text reply.

use crate::domain::ports::ClassifierVerdict;

use super::dto::VerdictDto;

/// Label used when the reply contained no decodable verdict.
pub(super) const UNSTRUCTURED_LABEL: &str = "Analysis Completed";
/// Confidence attached to an unstructured reply.
pub(super) const UNSTRUCTURED_CONFIDENCE: f64 = 0.70;
const DESCRIPTION_CHAR_LIMIT: usize = 200;
const UNSTRUCTURED_RECOMMENDATIONS: [&str; 3] = [
    "Consult a medical professional for accurate diagnosis",
    "Monitor the condition for any changes",
    "Maintain good hygiene practices",
];

/// Body of the first fenced block, or the whole reply when unfenced.
pub(super) fn json_block(reply: &str) -> &str {
    let fenced = reply
        .split_once("```json")
        .or_else(|| reply.split_once("```"))
        .map(|(_, rest)| rest.split_once("```").map_or(rest, |(body, _)| body));
    fenced.unwrap_or(reply).trim()
}

/// Decode a verdict from the reply, degrading to a generic one.
pub(super) fn interpret(reply: &str) -> ClassifierVerdict {
    match serde_json::from_str::<VerdictDto>(json_block(reply)) {
        Ok(dto) => ClassifierVerdict {
            label: dto.disease_name.unwrap_or_default(),
            confidence: dto.confidence.map_or(0.0, |value| value.value()),
            severity: dto.severity,
            description: dto.description,
            recommendations: dto.recommendations,
        },
        Err(_) => unstructured(reply),
    }
}

fn unstructured(reply: &str) -> ClassifierVerdict {
    ClassifierVerdict {
        label: UNSTRUCTURED_LABEL.to_owned(),
        confidence: UNSTRUCTURED_CONFIDENCE,
        severity: Some("medium".to_owned()),
        description: Some(reply.chars().take(DESCRIPTION_CHAR_LIMIT).collect()),
        recommendations: Some(
            UNSTRUCTURED_RECOMMENDATIONS
                .iter()
                .map(|item| (*item).to_owned())
                .collect(),
        ),
    }
}
