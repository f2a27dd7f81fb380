//! Prompt text sent with each image.

use crate::domain::ScanCategory;

const RESPONSE_FORMAT: &str = r#"Provide a response in the following JSON format:
{
    "disease_name": "Name of the detected condition",
    "confidence": 0.85,
    "severity": "low/medium/high",
    "recommendations": [
        "Recommendation 1",
        "Recommendation 2",
        "Recommendation 3"
    ],
    "description": "Brief description of the condition"
}"#;

pub(super) fn instructions(category: ScanCategory) -> String {
    format!(
        "Analyze this {category} image and detect any potential {category} diseases or \
         conditions.\n\n{RESPONSE_FORMAT}\n\nBe professional, accurate, and always recommend \
         consulting {} for proper diagnosis.",
        category.specialist()
    )
}
