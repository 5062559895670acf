//! Mapping from a source review to the WPRentals review payload.

use serde::Serialize;

use crate::source::SourceReview;
use crate::text;

use super::DestConfig;

/// Title length cap sent to the destination.
const TITLE_LIMIT: usize = 140;

/// Working cap applied to content during normalization, before the
/// configured outer limit.
const CONTENT_WORKING_LIMIT: usize = 800;

/// Length of the title excerpt derived from content when no headline exists.
const EXCERPT_LIMIT: usize = 80;

/// Fallback title when normalization leaves nothing usable.
const DEFAULT_TITLE: &str = "Review";

/// The six category ratings required by the destination endpoint, each
/// hard-coded to the minimum. Kept as-is from the source system; whether the
/// real score should be mapped is an unresolved contract question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRatings {
    pub accuracy: u8,
    pub communication: u8,
    pub cleanliness: u8,
    pub location: u8,
    pub check_in: u8,
    pub value: u8,
}

impl Default for CategoryRatings {
    fn default() -> Self {
        Self {
            accuracy: 1,
            communication: 1,
            cleanliness: 1,
            location: 1,
            check_in: 1,
            value: 1,
        }
    }
}

/// One review in the destination schema.
///
/// Invariant: `content` is empty only when the source review carried no
/// usable text in any of headline/pros/cons/review. Callers must skip such
/// payloads instead of submitting them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPayload {
    pub property_id: u64,
    pub user_id: u64,
    pub ratings: CategoryRatings,
    pub title: String,
    pub content: String,
}

/// Map one source review into the destination schema.
///
/// Content assembly: pros first, then `"Cons: " + cons`, with the headline
/// prepended; the free-text `review` field is used only when everything else
/// is empty. Sections are joined with a blank line, then title and content
/// are normalized and capped.
pub fn map_review(review: &SourceReview, config: &DestConfig) -> ReviewPayload {
    let headline = clean_field(review.headline.as_deref());
    let pros = clean_field(review.pros.as_deref());
    let cons = clean_field(review.cons.as_deref());

    let mut sections: Vec<String> = Vec::new();
    if !pros.is_empty() {
        sections.push(pros);
    }
    if !cons.is_empty() {
        sections.push(format!("Cons: {}", cons));
    }
    if !headline.is_empty() {
        sections.insert(0, headline.clone());
    }
    if sections.is_empty() {
        let fallback = clean_field(review.review.as_deref());
        if !fallback.is_empty() {
            sections.push(fallback);
        }
    }

    let assembled = sections.join("\n\n");

    let raw_title = if headline.is_empty() {
        text::limit_text(&assembled, EXCERPT_LIMIT)
    } else {
        headline
    };

    ReviewPayload {
        property_id: config.property_id,
        user_id: config.user_id,
        ratings: CategoryRatings::default(),
        title: prepare_title(&raw_title),
        content: prepare_content(&assembled, config.content_limit),
    }
}

fn clean_field(value: Option<&str>) -> String {
    value
        .map(|v| text::strip_markup(v).trim().to_string())
        .unwrap_or_default()
}

/// Single-line title, capped at 140 characters, with a literal fallback when
/// nothing survives normalization.
fn prepare_title(title: &str) -> String {
    let title = text::normalize(title, false);
    if title.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    text::limit_text(&title, TITLE_LIMIT)
}

/// Multi-line content, normalized with paragraph breaks preserved, passed
/// through the working cap and then the configured outer cap.
fn prepare_content(content: &str, content_limit: usize) -> String {
    let content = text::normalize(content, true);
    let content = text::limit_text(&content, CONTENT_WORKING_LIMIT);
    if content.is_empty() {
        return content;
    }
    text::limit_text(&content, content_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest_config() -> DestConfig {
        DestConfig {
            base_url: "https://rentals.example".into(),
            username: "importer".into(),
            password: "secret".into(),
            property_id: 124,
            user_id: 1,
            content_limit: 4000,
        }
    }

    fn review(headline: &str, pros: &str, cons: &str, fallback: &str) -> SourceReview {
        SourceReview {
            headline: Some(headline.to_string()),
            pros: Some(pros.to_string()),
            cons: Some(cons.to_string()),
            review: Some(fallback.to_string()),
            ..SourceReview::default()
        }
    }

    #[test]
    fn test_headline_and_pros() {
        let payload = map_review(&review("Great stay", "Clean room", "", ""), &dest_config());
        assert_eq!(payload.title, "Great stay");
        assert_eq!(payload.content, "Great stay\n\nClean room");
    }

    #[test]
    fn test_section_order_pros_cons_headline() {
        let payload = map_review(
            &review("Nice place", "Good view", "Noisy street", ""),
            &dest_config(),
        );
        assert_eq!(
            payload.content,
            "Nice place\n\nGood view\n\nCons: Noisy street"
        );
    }

    #[test]
    fn test_review_fallback_only_when_sections_empty() {
        let payload = map_review(&review("", "", "", "Just okay overall."), &dest_config());
        assert_eq!(payload.content, "Just okay overall.");

        // A non-empty section suppresses the fallback
        let payload = map_review(&review("", "Spotless", "", "ignored"), &dest_config());
        assert_eq!(payload.content, "Spotless");
    }

    #[test]
    fn test_empty_review_maps_to_empty_content() {
        let payload = map_review(&SourceReview::default(), &dest_config());
        assert_eq!(payload.content, "");

        let payload = map_review(&review("", "", "", ""), &dest_config());
        assert_eq!(payload.content, "");
    }

    #[test]
    fn test_map_is_idempotent_for_same_input() {
        let input = review("Great stay", "Clean room", "Thin walls", "");
        assert_eq!(map_review(&input, &dest_config()), map_review(&input, &dest_config()));
    }

    #[test]
    fn test_markup_stripped_before_assembly() {
        let payload = map_review(
            &review("<b>Great</b> stay", "Room was <i>clean</i>", "", ""),
            &dest_config(),
        );
        assert_eq!(payload.title, "Great stay");
        assert_eq!(payload.content, "Great stay\n\nRoom was clean");
    }

    #[test]
    fn test_title_fallback_literal() {
        // Nothing usable anywhere: title still gets the literal default
        let payload = map_review(&SourceReview::default(), &dest_config());
        assert_eq!(payload.title, "Review");

        // Whitespace/control-only headline normalizes to empty too
        let payload = map_review(&review("  \u{00}\u{07} ", "", "", ""), &dest_config());
        assert_eq!(payload.title, "Review");
    }

    #[test]
    fn test_title_derived_from_content_when_no_headline() {
        let payload = map_review(&review("", "Lovely garden and pool", "", ""), &dest_config());
        assert_eq!(payload.title, "Lovely garden and pool");
    }

    #[test]
    fn test_title_capped_at_140() {
        let long = "word ".repeat(60);
        let payload = map_review(&review(&long, "pros", "", ""), &dest_config());
        assert!(payload.title.chars().count() <= 140);
        assert!(payload.title.ends_with("..."));
    }

    #[test]
    fn test_content_working_cap() {
        let long = "lorem ipsum dolor sit amet ".repeat(100);
        let payload = map_review(&review("", &long, "", ""), &dest_config());
        assert!(payload.content.chars().count() <= 800);
        assert!(payload.content.ends_with("..."));
    }

    #[test]
    fn test_content_outer_cap_when_configured_lower() {
        let mut config = dest_config();
        config.content_limit = 100;
        let long = "lorem ipsum dolor sit amet ".repeat(100);
        let payload = map_review(&review("", &long, "", ""), &config);
        assert!(payload.content.chars().count() <= 100);
    }

    #[test]
    fn test_fixed_ratings_block() {
        let payload = map_review(&review("Great", "", "", ""), &dest_config());
        assert_eq!(payload.ratings, CategoryRatings::default());
        assert_eq!(payload.ratings.cleanliness, 1);
    }

    #[test]
    fn test_payload_serializes_to_destination_schema() {
        let payload = map_review(&review("Great stay", "Clean room", "", ""), &dest_config());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["property_id"], 124);
        assert_eq!(value["user_id"], 1);
        assert_eq!(value["ratings"]["check_in"], 1);
        assert_eq!(value["title"], "Great stay");
    }
}
