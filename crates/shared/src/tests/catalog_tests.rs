use super::*;

#[test]
fn known_codes_resolve_to_labels() {
    assert_eq!(committee_label("unep"), "UN Environment Programme (UNEP)");
    assert_eq!(committee_label("unfpa"), "UN Population Fund (UNFPA)");
    assert_eq!(experience_label("5+"), "5+ conferences");
    assert_eq!(experience_label("none"), "No prior experience");
}

#[test]
fn unknown_codes_fall_back_to_raw_code() {
    assert_eq!(committee_label("unsc"), "unsc");
    assert_eq!(experience_label("10+"), "10+");
    assert_eq!(committee_label(""), "");
}

#[test]
fn contains_matches_exact_codes_only() {
    assert!(contains(COMMITTEES, "unep"));
    assert!(!contains(COMMITTEES, "UNEP"));
    assert!(contains(EXPERIENCE_LEVELS, "1-2"));
}
