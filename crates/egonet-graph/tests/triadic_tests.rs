use approx::assert_relative_eq;
use egonet_core::{ContextCategory, EgoNetError, Person};
use egonet_graph::EgoNetwork;

/// Ego 1 with alters 2, 3 and 4; 2 and 3 know each other.
fn network() -> EgoNetwork {
    let mut net = EgoNetwork::new(Person::new(1, "Me")).unwrap();
    net.add_alter(Person::new(2, "Bea").with_strong_tie(true))
        .unwrap();
    net.add_alter(Person::new(3, "Cal").with_strong_tie(true))
        .unwrap();
    net.add_alter(Person::new(4, "Dot")).unwrap();
    net.add_direct_edge(2, 3).unwrap();
    net
}

#[test]
fn closed_strong_pair_scores_one() {
    let net = network();
    let result = net.triadic_closure().validate().unwrap();
    assert_eq!(result.pairs_inspected, 1);
    assert_relative_eq!(result.hit_rate, 1.0);
}

#[test]
fn open_pairs_lower_the_rate() {
    let mut net = network();
    net.set_strong_tie("Dot", true).unwrap();
    let result = net.triadic_closure().validate().unwrap();
    assert_eq!(result.pairs_inspected, 3);
    assert_relative_eq!(result.hit_rate, 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn weak_ties_are_not_paired() {
    let mut net = network();
    net.set_strong_tie(3u64, false).unwrap();
    assert!(!net.graph().tie(1, 3).unwrap().strong);

    let result = net.triadic_closure().validate().unwrap();
    assert_eq!(result.pairs_inspected, 0);
    assert_relative_eq!(result.hit_rate, 0.0);
}

#[test]
fn no_strong_ties_is_an_error() {
    let mut net = network();
    net.set_strong_tie("Bea", false).unwrap();
    net.set_strong_tie("Cal", false).unwrap();
    assert!(net.triadic_closure().strong_alters().is_empty());
    assert!(matches!(
        net.triadic_closure().validate(),
        Err(EgoNetError::EmptyStrongTieSet)
    ));
}

#[test]
fn alter_ties_never_count_as_strong_ego_ties() {
    let mut net = network();
    net.add_alter(Person::new(5, "Eve")).unwrap();
    net.add_direct_edge(4, 5).unwrap();
    let mut strong = net.triadic_closure().strong_alters();
    strong.sort_unstable();
    assert_eq!(strong, vec![2, 3]);
}

#[test]
fn context_restricted_closure() {
    let mut net = network();
    net.set_strong_tie("Dot", true).unwrap();
    let school = net.register_context("Hill High", ContextCategory::School);
    let work = net.register_context("Mill", ContextCategory::Work);
    let family = net.register_fallback_context("family");
    net.code_known_from("Bea", school).unwrap();
    net.code_known_from("Cal", school).unwrap();
    net.code_known_from("Dot", work).unwrap();

    let validator = net.triadic_closure();
    let at_school = validator.validate_within_context(school).unwrap();
    assert_eq!(at_school.pairs_inspected, 1);
    assert_relative_eq!(at_school.hit_rate, 1.0);

    let at_work = validator.validate_within_context(work).unwrap();
    assert_eq!(at_work.pairs_inspected, 0);
    assert_relative_eq!(at_work.hit_rate, 0.0);

    assert_eq!(
        validator.validate_within_context(family).unwrap().pairs_inspected,
        0
    );
    assert!(matches!(
        validator.validate_within_context(77),
        Err(EgoNetError::UnknownContext(77))
    ));
}

#[test]
fn tie_coding_rejects_ego_and_bad_strengths() {
    let mut net = network();
    assert!(matches!(
        net.set_strong_tie(1u64, true),
        Err(EgoNetError::UnknownPerson(_))
    ));
    assert!(matches!(
        net.set_tie_strength("Bea", 1.5),
        Err(EgoNetError::InvalidTieStrength(_))
    ));
    net.set_tie_strength("Bea", 0.25).unwrap();
    assert_relative_eq!(net.graph().tie(1, 2).unwrap().weight, 0.25);
    assert_eq!(net.store().person(2).unwrap().tie_strength, Some(0.25));
}

#[test]
fn hit_rate_stays_in_unit_interval() {
    let mut net = network();
    for id in 5..12u64 {
        net.add_alter(Person::new(id, format!("P{}", id)).with_strong_tie(id % 2 == 0))
            .unwrap();
        if id % 3 == 0 {
            net.add_direct_edge(id, 2).unwrap();
        }
    }
    let result = net.triadic_closure().validate().unwrap();
    assert!(result.pairs_inspected > 0);
    assert!((0.0..=1.0).contains(&result.hit_rate));
}
