//! Heuristic publication-type classification.
//!
//! Neither source reports a reliable category, so the type is guessed from
//! free text: lower-cased substring matching over an ordered rule list,
//! first match wins. The result is a display aid, not authoritative
//! metadata.

use crate::models::PublicationType;

type Rule = (PublicationType, &'static [&'static str]);

/// Rules applied to Scholar venue strings.
pub const VENUE_RULES: &[Rule] = &[
    (PublicationType::Journal,    &["journal", "transactions", "letters"]),
    (PublicationType::Conference, &["conference", "proceedings", "symposium"]),
    (PublicationType::Review,     &["review", "survey"]),
];

/// Rules applied to ORCID work-type codes (`journal-article`, `conference-paper`, ...).
pub const ORCID_TYPE_RULES: &[Rule] = &[
    (PublicationType::Journal,    &["journal-article"]),
    (PublicationType::Conference, &["conference", "proceedings", "symposium"]),
    (PublicationType::Review,     &["review", "survey"]),
];

/// Apply `rules` in order. Unmatched or absent text is [`PublicationType::Other`].
pub fn classify_with(rules: &[Rule], text: Option<&str>) -> PublicationType {
    let Some(text) = text else {
        return PublicationType::Other;
    };
    let lower = text.to_lowercase();
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or(PublicationType::Other)
}

/// Classify a Scholar venue string.
pub fn classify(venue: &str) -> PublicationType {
    classify_with(VENUE_RULES, Some(venue))
}

/// Classify an ORCID work-type code.
pub fn classify_orcid_type(work_type: Option<&str>) -> PublicationType {
    classify_with(ORCID_TYPE_RULES, work_type)
}
