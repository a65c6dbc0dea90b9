//! Leave request classification.
//!
//! Requests carry an explicit [`LeaveCategory`] tag when they were created
//! through a category-aware client. Older requests only have free-text reasons,
//! so this module falls back to best-effort keyword matching over word stems.
//!
//! ## Precedence
//!
//! When a reason matches several categories the first in this order wins:
//! maternity, paternity, bereavement, sick, medical, emergency, ordinary.
//! Anything unmatched is [`LeaveCategory::Other`].
//!
//! A reason that only says "parental" names no specific type. It is resolved
//! against the member's configured parental leave type by [`categorize_for`],
//! and stays [`LeaveCategory::Other`] for members without one.

use crate::models::{LeaveCategory, LeaveRequest, ParentalLeaveType};

/// Keywords per category, in precedence order: `(category, stems, words)`.
///
/// A word matches a stem when it starts with it, so `pregnan` covers
/// "pregnant" and "pregnancy". Short keywords are whole words only, so "flu"
/// does not match "fluent".
const CATEGORY_KEYWORDS: &[(LeaveCategory, &[&str], &[&str])] = &[
    (
        LeaveCategory::Maternity,
        &["maternity", "maternal", "pregnan", "prenatal", "antenatal", "postnatal"],
        &[],
    ),
    (LeaveCategory::Paternity, &["paternity", "paternal"], &[]),
    (
        LeaveCategory::Bereavement,
        &["bereave", "funeral", "condolence", "mourning", "memorial", "compassionate"],
        &[],
    ),
    (
        LeaveCategory::Sick,
        &["sick", "illness", "unwell", "fever", "influenza"],
        &["flu"],
    ),
    (
        LeaveCategory::Medical,
        &["medical", "doctor", "hospital", "surgery", "dental", "dentist", "clinic", "physio"],
        &[],
    ),
    (LeaveCategory::Emergency, &["emergency", "urgent", "accident"], &[]),
    (
        LeaveCategory::Ordinary,
        &["annual", "vacation", "holiday", "travel"],
        &["pto", "trip", "trips"],
    ),
];

/// Stems of parental reasons that do not say which parent.
const GENERIC_PARENTAL_STEMS: &[&str] = &["parental", "parenthood", "adoption", "adoptive"];

fn words(reason_text: &str) -> Vec<String> {
    reason_text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn matches(words: &[String], stems: &[&str], whole_words: &[&str]) -> bool {
    words.iter().any(|word| {
        stems.iter().any(|stem| word.starts_with(stem))
            || whole_words.iter().any(|w| word == w)
    })
}

/// Classifies a free-text leave reason.
///
/// Matching is case-insensitive and works on words, so "Sickness" matches
/// the `sick` stem but "homesick" does not.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::classify;
/// use leave_engine::models::LeaveCategory;
///
/// assert_eq!(classify("Annual family bereavement leave"), LeaveCategory::Bereavement);
/// assert_eq!(classify("Summer VACATION"), LeaveCategory::Ordinary);
/// assert_eq!(classify("Moving house"), LeaveCategory::Other);
/// ```
pub fn classify(reason_text: &str) -> LeaveCategory {
    let words = words(reason_text);

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, stems, whole_words)| matches(&words, stems, whole_words))
        .map(|(category, _, _)| *category)
        .unwrap_or(LeaveCategory::Other)
}

/// Returns the category of a request.
///
/// An explicit tag is authoritative; untagged requests are classified from
/// their reason text.
pub fn categorize(request: &LeaveRequest) -> LeaveCategory {
    request
        .category
        .unwrap_or_else(|| classify(&request.reason_text))
}

/// Returns the category of a request for a member with `parental_type`.
///
/// Same as [`categorize`], except that an untagged reason which only says
/// "parental" takes the member's parental leave type.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::categorize_for;
/// use leave_engine::models::{LeaveCategory, LeaveRequest, LeaveStatus, ParentalLeaveType};
/// use chrono::{NaiveDate, Utc};
///
/// let request = LeaveRequest {
///     id: "req_001".to_string(),
///     member_id: "m_001".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
///     reason_text: "Parental leave".to_string(),
///     category: None,
///     status: LeaveStatus::Approved,
///     created_at: Utc::now(),
/// };
///
/// assert_eq!(
///     categorize_for(&request, Some(ParentalLeaveType::Paternity)),
///     LeaveCategory::Paternity
/// );
/// assert_eq!(categorize_for(&request, None), LeaveCategory::Other);
/// ```
pub fn categorize_for(
    request: &LeaveRequest,
    parental_type: Option<ParentalLeaveType>,
) -> LeaveCategory {
    let category = categorize(request);
    if category != LeaveCategory::Other || request.category.is_some() {
        return category;
    }
    if !matches(&words(&request.reason_text), GENERIC_PARENTAL_STEMS, &[]) {
        return category;
    }

    match parental_type {
        Some(ParentalLeaveType::Maternity) => LeaveCategory::Maternity,
        Some(ParentalLeaveType::Paternity) => LeaveCategory::Paternity,
        Some(ParentalLeaveType::None) | None => category,
    }
}
