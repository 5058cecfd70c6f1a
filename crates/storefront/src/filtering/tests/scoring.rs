use super::common::*;
use crate::filtering::scoring::{score, tokenize, MatchQuality, MAX_SCORE_PER_TERM};

fn terms(raw: &str) -> Vec<String> {
    tokenize(raw)
}

#[test]
fn exact_words_earn_full_weight_and_substrings_half() {
    let breakdown = score(&apex_running_shoe(), &terms("running shoe"));

    // "running" and "shoe" are both whole words of the name; "shoe" only prefixes "shoes".
    assert_close(breakdown.name_score, 20.0);
    assert_close(breakdown.brand_score, 0.0);
    assert_close(breakdown.sport_score, 4.0);
    assert_close(breakdown.category_score, 1.5);
    assert_close(breakdown.total_score, 25.5);
    assert_close(breakdown.max_possible_score, 46.0);
    assert_close(breakdown.match_percentage, 25.5 / 46.0 * 100.0);
    assert_eq!(breakdown.matched_term_count, 2);
    assert_eq!(breakdown.search_terms, vec!["running", "shoe"]);
    assert_eq!(breakdown.match_quality(), MatchQuality::High);
}

#[test]
fn substring_only_term_still_counts_as_matched() {
    let breakdown = score(&apex_running_shoe(), &terms("run"));

    assert_close(breakdown.name_score, 5.0);
    assert_close(breakdown.sport_score, 2.0);
    assert_close(breakdown.total_score, 7.0);
    assert_eq!(breakdown.matched_term_count, 1);
    assert_eq!(breakdown.match_quality(), MatchQuality::Medium);
}

#[test]
fn empty_terms_produce_zero_breakdown() {
    let breakdown = score(&apex_running_shoe(), &[]);

    assert_close(breakdown.total_score, 0.0);
    assert_close(breakdown.max_possible_score, 0.0);
    assert_close(breakdown.match_percentage, 0.0);
    assert_eq!(breakdown.matched_term_count, 0);
    assert!(breakdown.search_terms.is_empty());
}

#[test]
fn repeated_terms_accumulate_but_match_once() {
    let breakdown = score(&apex_running_shoe(), &terms("shoe shoe"));

    assert_close(breakdown.name_score, 20.0);
    assert_close(breakdown.max_possible_score, 2.0 * MAX_SCORE_PER_TERM);
    assert_eq!(breakdown.matched_term_count, 1);
}

#[test]
fn unmatched_terms_score_nothing() {
    let breakdown = score(&apex_running_shoe(), &terms("yoga mat"));

    assert_close(breakdown.total_score, 0.0);
    assert_eq!(breakdown.matched_term_count, 0);
    assert_eq!(breakdown.match_quality(), MatchQuality::Low);
}

#[test]
fn comparison_ignores_case_of_product_fields() {
    let shoe = product("prod-x", "APEX TRAIL SHOE", "APEX", "RUNNING", "SHOES", 4);
    let breakdown = score(&shoe, &terms("Apex"));

    assert_close(breakdown.name_score, 10.0);
    assert_close(breakdown.brand_score, 6.0);
}

#[test]
fn appending_a_matching_term_never_lowers_the_score() {
    let catalog = sample_catalog();

    for product in &catalog {
        let base = score(product, &terms("golf"));
        let extended = score(product, &terms("golf nova"));
        assert!(
            extended.total_score >= base.total_score,
            "{}: {} < {}",
            product.id,
            extended.total_score,
            base.total_score
        );
    }
}

#[test]
fn tokenize_lowercases_and_drops_blank_tokens() {
    assert_eq!(tokenize("  Running \t SHOE  "), vec!["running", "shoe"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn match_quality_thresholds() {
    assert_eq!(MatchQuality::from_percentage(50.0), MatchQuality::High);
    assert_eq!(MatchQuality::from_percentage(49.9), MatchQuality::Medium);
    assert_eq!(MatchQuality::from_percentage(25.0), MatchQuality::Medium);
    assert_eq!(MatchQuality::from_percentage(24.99), MatchQuality::Low);
}
