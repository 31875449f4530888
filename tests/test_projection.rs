//! Tests for the filter predicate and the result projection.
//!
//! Tests cover:
//! - Facet combination (AND across categories, OR within one)
//! - `N+` count bands, price buckets and free-text search
//! - Catalog order, counts and the results summary

mod common;

use common::*;

fn state_from(query: &str) -> FilterState {
    FilterState::from_navigable_state(query)
}

#[test]
fn test_empty_state_matches_every_plan() {
    let plans = sample_plans();
    let projection = project(&plans, &FilterState::new());

    assert_eq!(ids(&projection.results), vec![1, 2, 3]);
    assert_eq!(projection.count, 3);
    assert_eq!(projection.total, 3);
    assert_eq!(projection.summary(), "Showing all 3 house plans");
}

#[test]
fn test_bedrooms_and_style_combine_conjunctively() -> anyhow::Result<()> {
    let plans = sample_plans();
    let mut state = FilterState::new();
    state.select(FacetCategory::Bedrooms, "3")?;
    state.select(FacetCategory::Style, "Modern")?;

    let projection = project(&plans, &state);

    assert_eq!(ids(&projection.results), vec![1]);
    assert_eq!(projection.count, 1);
    assert_eq!(projection.total, 3);
    assert_eq!(projection.summary(), "Showing 1 of 3 house plans");
    Ok(())
}

#[test]
fn test_values_within_category_combine_disjunctively() {
    let plans = sample_plans();
    let projection = project(&plans, &state_from("style=Modern,Farmhouse&bedrooms=3"));
    assert_eq!(ids(&projection.results), vec![1, 3]);
}

#[test]
fn test_search_query_matches_style_substring() {
    let plans = sample_plans();
    let mut state = FilterState::new();
    state.set_query("farm");

    let projection = project(&plans, &state);

    assert_eq!(ids(&projection.results), vec![3]);
    assert_eq!(projection.results_label(), "1 result");
}

#[test]
fn test_search_is_case_insensitive_and_covers_title_bedrooms_and_id() {
    let mut plans = sample_plans();
    plans[1].title = "The Willow".to_string();
    plans[1].subtitle = Some("Split-level family home".to_string());

    let by_title = project(&plans, &state_from("q=WILLOW"));
    assert_eq!(ids(&by_title.results), vec![2]);

    let by_subtitle = project(&plans, &state_from("q=split-level"));
    assert_eq!(ids(&by_subtitle.results), vec![2]);

    let by_bedrooms = project(&plans, &state_from("q=4+bedroom"));
    assert_eq!(ids(&by_bedrooms.results), vec![2]);

    let by_type = project(&plans, &state_from("q=house"));
    assert_eq!(by_type.count, 3);
    assert_eq!(by_type.results_label(), "3 results");
}

#[test]
fn test_at_least_band_matches_larger_counts() {
    let plans = sample_plans();
    let projection = project(&plans, &state_from("bedrooms=4%2B"));
    assert_eq!(ids(&projection.results), vec![2]);

    let three_plus = project(&plans, &state_from("bedrooms=3%2B"));
    assert_eq!(ids(&three_plus.results), vec![1, 2, 3]);
}

#[test]
fn test_price_range_bounds_are_inclusive() {
    let plans = sample_plans();

    let closed = project(&plans, &state_from("price=150000-180000"));
    assert_eq!(ids(&closed.results), vec![1, 3]);

    let open = project(&plans, &state_from("price=180000"));
    assert_eq!(ids(&open.results), vec![2, 3]);
}

#[test]
fn test_text_facets_ignore_case() {
    let plans = sample_plans();
    let projection = project(&plans, &state_from("style=modern"));
    assert_eq!(ids(&projection.results), vec![1, 2]);
}

#[test]
fn test_type_floors_bathrooms_and_size_band() {
    let mut plans = sample_plans();
    plans[0].kind = "Duplex".to_string();
    plans[1].floors = 2;
    plans[2].bathrooms = 3;
    plans[2].size_band = "150-200".to_string();

    assert_eq!(ids(&project(&plans, &state_from("type=Duplex")).results), vec![1]);
    assert_eq!(ids(&project(&plans, &state_from("floors=2")).results), vec![2]);
    assert_eq!(ids(&project(&plans, &state_from("bathrooms=3")).results), vec![3]);
    assert_eq!(ids(&project(&plans, &state_from("size=150-200")).results), vec![3]);
}

#[test]
fn test_no_match_yields_empty_projection() {
    let plans = sample_plans();
    let projection = project(&plans, &state_from("style=Colonial"));

    assert!(projection.is_empty());
    assert_eq!(projection.count, 0);
    assert_eq!(projection.total, 3);
    assert_eq!(projection.results_label(), "0 results");
}

#[test]
fn test_projection_preserves_catalog_order() {
    let plans = vec![
        make_plan(9, 3, "Modern", 1.0),
        make_plan(4, 3, "Modern", 1.0),
        make_plan(7, 3, "Modern", 1.0),
    ];
    let projection = project(&plans, &state_from("bedrooms=3"));
    assert_eq!(ids(&projection.results), vec![9, 4, 7]);
}

#[test]
fn test_matches_agrees_with_method_form() -> anyhow::Result<()> {
    let plans = sample_plans();
    let mut state = FilterState::new();
    state.select(FacetCategory::Style, "Farmhouse")?;

    for plan in &plans {
        assert_eq!(matches(plan, &state), state.matches(plan));
    }
    assert!(state.matches(&plans[2]));
    assert!(!state.matches(&plans[0]));
    Ok(())
}
