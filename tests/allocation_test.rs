//! Allocation engine behavior on the default ledger.
//!
//! Electronics 1500 (Phones 800, Laptops 700), Furniture 1000 (Tables 300, Chairs 700).

use rstest::{fixture, rstest};

use rsledger::domain::{
    Adjustment, AllocationTarget, CategoryConfig, Entry, EntryConfig, Ledger,
};
use rsledger::util::testing;

const TOLERANCE: f64 = 1e-9;

#[fixture]
fn ledger() -> Ledger {
    testing::init_test_setup();
    testing::seed_ledger()
}

fn entry<'a>(ledger: &'a Ledger, id: &str) -> &'a Entry {
    ledger
        .find(id)
        .unwrap_or_else(|| panic!("entry {id} should exist"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Every parent equals the sum of its children.
fn assert_parents_aggregated(ledger: &Ledger) {
    for category in ledger.categories() {
        if let Some(children) = category.children() {
            let sum: f64 = children.iter().map(Entry::value).sum();
            assert!(
                (category.value() - sum).abs() < TOLERANCE,
                "{} = {}, children sum to {}",
                category.id(),
                category.value(),
                sum
            );
        }
    }
}

/// Every entry's variance matches its value and baseline.
fn assert_variances_consistent(ledger: &Ledger) {
    for entry in ledger.entries() {
        let expected =
            (entry.value() - entry.original_value()) / entry.original_value() * 100.0;
        assert!(
            (entry.variance() - expected).abs() < TOLERANCE,
            "{}: variance {} != {}",
            entry.id(),
            entry.variance(),
            expected
        );
    }
}

#[rstest]
fn given_phones_plus_ten_percent_then_electronics_rolls_up(ledger: Ledger) {
    let after = ledger.apply_percentage("phones", 10.0);

    assert_close(entry(&after, "phones").value(), 880.0);
    assert_close(entry(&after, "phones").variance(), 10.0);
    assert_close(entry(&after, "laptops").value(), 700.0);
    assert_close(entry(&after, "electronics").value(), 1580.0);
    assert_close(entry(&after, "electronics").variance(), 80.0 / 1500.0 * 100.0);
    assert_close(after.grand_total(), 2580.0);
    assert_eq!(format!("{:.2}", entry(&after, "electronics").variance()), "5.33");
}

#[rstest]
fn given_tables_set_to_450_then_furniture_rolls_up(ledger: Ledger) {
    let after = ledger.apply_value("tables", 450.0);

    assert_close(entry(&after, "tables").value(), 450.0);
    assert_close(entry(&after, "tables").variance(), 50.0);
    assert_close(entry(&after, "furniture").value(), 1150.0);
    assert_close(entry(&after, "furniture").variance(), 15.0);
    assert_close(after.grand_total(), 2650.0);
}

#[rstest]
fn given_root_with_children_edited_then_children_keep_their_values(ledger: Ledger) {
    let after = ledger.apply_percentage("electronics", 5.0);

    assert_close(entry(&after, "electronics").value(), 1575.0);
    assert_close(entry(&after, "electronics").variance(), 5.0);
    assert_close(entry(&after, "phones").value(), 800.0);
    assert_close(entry(&after, "laptops").value(), 700.0);
    assert_close(after.grand_total(), 2575.0);
}

#[rstest]
fn given_root_edit_when_child_edited_later_then_parent_re_aggregates(ledger: Ledger) {
    let after = ledger
        .apply_percentage("electronics", 5.0)
        .apply_value("laptops", 700.0);

    assert_close(entry(&after, "electronics").value(), 1500.0);
    assert_close(entry(&after, "electronics").variance(), 0.0);
}

#[rstest]
fn given_root_edit_when_other_root_child_edited_then_stale_root_kept(ledger: Ledger) {
    let after = ledger
        .apply_value("electronics", 2000.0)
        .apply_value("tables", 400.0);

    assert_close(entry(&after, "electronics").value(), 2000.0);
    assert_close(entry(&after, "furniture").value(), 1100.0);
}

#[rstest]
fn given_unknown_id_then_ledger_is_identical(ledger: Ledger) {
    assert_eq!(ledger.apply_percentage("nonexistent", 10.0), ledger);
    assert_eq!(ledger.apply_value("nonexistent", 10.0), ledger);

    let allocation = ledger.apply("nonexistent", Adjustment::Percentage(10.0));
    assert!(!allocation.is_applied());
    assert_eq!(allocation.target, None);
}

#[rstest]
#[case("phones", Adjustment::Percentage(10.0))]
#[case("laptops", Adjustment::Percentage(-30.0))]
#[case("tables", Adjustment::Value(450.0))]
#[case("chairs", Adjustment::Value(0.0))]
#[case("phones", Adjustment::Value(123.45))]
fn given_child_allocation_then_invariants_hold(
    ledger: Ledger,
    #[case] row_id: &str,
    #[case] adjustment: Adjustment,
) {
    let allocation = ledger.apply(row_id, adjustment);

    assert!(matches!(
        allocation.target,
        Some(AllocationTarget::Child { .. })
    ));
    assert_parents_aggregated(&allocation.ledger);
    assert_variances_consistent(&allocation.ledger);
}

#[rstest]
fn given_sequence_of_child_allocations_then_invariants_hold_after_each(ledger: Ledger) {
    let steps = [
        ("phones", Adjustment::Percentage(10.0)),
        ("tables", Adjustment::Value(450.0)),
        ("laptops", Adjustment::Percentage(-12.5)),
        ("phones", Adjustment::Value(1000.0)),
        ("chairs", Adjustment::Percentage(3.0)),
    ];

    let mut current = ledger;
    for (row_id, adjustment) in steps {
        current = current.apply(row_id, adjustment).ledger;
        assert_parents_aggregated(&current);
        assert_variances_consistent(&current);
    }
}

#[rstest]
fn given_repeated_percentage_then_compounds_on_current_value(ledger: Ledger) {
    let after = ledger
        .apply_percentage("phones", 10.0)
        .apply_percentage("phones", 10.0);

    assert_close(entry(&after, "phones").value(), 968.0);
    assert_close(entry(&after, "phones").variance(), 21.0);
}

#[rstest]
fn given_no_allocation_then_grand_total_is_stable(ledger: Ledger) {
    let after = ledger.apply_value("chairs", 650.0);
    let first = after.grand_total();
    let second = after.grand_total();
    assert_eq!(first, second);
    assert_close(first, 2450.0);
}

#[rstest]
fn given_allocation_then_original_values_never_change(ledger: Ledger) {
    let after = ledger
        .apply_percentage("electronics", 50.0)
        .apply_value("tables", 1.0)
        .apply_percentage("phones", -100.0);

    for (before, after) in ledger.entries().zip(after.entries()) {
        assert_eq!(before.id(), after.id());
        assert_eq!(before.original_value(), after.original_value());
    }
}

#[test]
fn given_zero_baseline_then_variance_is_not_finite() {
    let ledger = Ledger::from_config(&[CategoryConfig::parent(
        "new",
        "New",
        0.0,
        vec![EntryConfig::new("startup", "Startup", 0.0)],
    )])
    .expect("zero baselines are accepted");

    let after = ledger.apply_value("startup", 100.0);
    assert_eq!(entry(&after, "startup").variance(), f64::INFINITY);
    assert_eq!(entry(&after, "new").variance(), f64::INFINITY);

    let unchanged = ledger.apply_percentage("startup", 10.0);
    assert!(entry(&unchanged, "startup").variance().is_nan());
}

#[test]
fn given_leaf_root_then_allocation_changes_only_that_root() {
    let ledger = Ledger::from_config(&[
        CategoryConfig::leaf("misc", "Misc", 200.0),
        CategoryConfig::parent(
            "furniture",
            "Furniture",
            1000.0,
            vec![EntryConfig::new("tables", "Tables", 1000.0)],
        ),
    ])
    .expect("build ledger");

    let after = ledger.apply_percentage("misc", -25.0);

    assert_close(entry(&after, "misc").value(), 150.0);
    assert_close(entry(&after, "misc").variance(), -25.0);
    assert_eq!(entry(&after, "furniture"), entry(&ledger, "furniture"));
    assert_close(after.grand_total(), 1150.0);
}

#[test]
fn given_nan_amount_then_propagates_without_failing() {
    let ledger = testing::seed_ledger();
    let after = ledger.apply_value("phones", f64::NAN);
    assert!(entry(&after, "phones").value().is_nan());
    assert!(entry(&after, "electronics").value().is_nan());
    assert!(after.grand_total().is_nan());
}
