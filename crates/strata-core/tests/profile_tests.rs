mod common;

use common::profile;
use strata_core::{ActivationKind, ProfileActivator, ProfileExpression};

#[test]
fn test_programmatic_before_file_declared() {
    let mut activator = ProfileActivator::new();

    // Programmatic profiles are applied before any document is
    // scanned, so file-declared activations always land after them.
    activator
        .activate(profile("x"), ActivationKind::Programmatic)
        .unwrap();
    activator
        .activate(profile("y"), ActivationKind::Document)
        .unwrap();
    activator.finalize().unwrap();

    let (active, _) = activator.into_parts().unwrap();
    let names: Vec<&str> = active.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_duplicate_activation_preserves_first_position() {
    let mut activator = ProfileActivator::new();
    activator
        .activate(profile("dev"), ActivationKind::Override)
        .unwrap();
    activator
        .activate(profile("other"), ActivationKind::Document)
        .unwrap();
    activator
        .activate(profile("dev"), ActivationKind::Document)
        .unwrap();
    activator.finalize().unwrap();

    let (active, _) = activator.into_parts().unwrap();
    let names: Vec<&str> = active.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, vec!["dev", "other"]);
}

#[test]
fn test_finalized_activator_rejects_widening() {
    let mut activator = ProfileActivator::new();
    activator.finalize().unwrap();

    assert!(activator
        .activate(profile("late"), ActivationKind::Document)
        .unwrap_err()
        .is_invalid_state());
}

#[test]
fn test_expression_against_grown_set() {
    let mut activator = ProfileActivator::new();
    let expr = ProfileExpression::parse("dev").unwrap();

    assert!(!expr.matches(&activator.matching_profiles()));

    activator
        .activate(profile("dev"), ActivationKind::Document)
        .unwrap();
    assert!(expr.matches(&activator.matching_profiles()));
}

#[test]
fn test_negation_against_default_set() {
    let activator = ProfileActivator::new();
    let expr = ProfileExpression::parse("!other").unwrap();

    // With nothing active the matching set is the default profile, so
    // a negated document applies.
    assert!(expr.matches(&activator.matching_profiles()));
}

#[test]
fn test_default_profile_matches_while_nothing_active() {
    let mut activator = ProfileActivator::new();
    activator.set_default_profile(profile("thedefault")).unwrap();

    let expr = ProfileExpression::parse("thedefault").unwrap();
    assert!(expr.matches(&activator.matching_profiles()));

    activator
        .activate(profile("real"), ActivationKind::Document)
        .unwrap();
    assert!(!expr.matches(&activator.matching_profiles()));
}
