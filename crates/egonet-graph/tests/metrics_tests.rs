use approx::assert_relative_eq;
use egonet_core::{
    AnalysisConfig, AttributeValue, ContextCategory, EgoNetError, Gender, Person, Roster,
};
use egonet_graph::metrics::ClusterGroup;
use egonet_graph::{average_centrality, CentralityKind, EgoNetwork, EgoScope, ISOLATE_SENTINEL};

/// Me(F) tied to Bea(F), Cal(F), Dot(M), Eve(M); Bea–Cal and Bea–Dot are
/// mutual friends; Eve only knows the ego.
fn network() -> EgoNetwork {
    EgoNetwork::from_roster(Roster::new(
        1,
        vec![
            Person::new(1, "Me").with_gender(Gender::Female),
            Person::new(2, "Bea")
                .with_gender(Gender::Female)
                .with_mutual_friends([3, 4]),
            Person::new(3, "Cal")
                .with_gender(Gender::Female)
                .with_mutual_friends([2]),
            Person::new(4, "Dot")
                .with_gender(Gender::Male)
                .with_mutual_friends([2]),
            Person::new(5, "Eve").with_gender(Gender::Male),
        ],
    ))
    .unwrap()
}

#[test]
fn isolates_report_sentinel_for_every_centrality() {
    let net = network();
    let metrics = net.metrics();
    for kind in [
        CentralityKind::Degree,
        CentralityKind::Betweenness,
        CentralityKind::Closeness,
        CentralityKind::Eigenvector,
    ] {
        let scores = metrics.centrality(kind, EgoScope::WithoutEgo).unwrap();
        assert_eq!(scores[&5], ISOLATE_SENTINEL, "{} for Eve", kind);
        assert!(!scores.contains_key(&1), "{} still scores the ego", kind);
        assert_eq!(scores.len(), 4);
        for id in 2..=4u64 {
            assert!(scores[&id] >= 0.0);
        }
    }
}

#[test]
fn ego_free_centralities_on_a_path() {
    let net = network();
    let metrics = net.metrics();

    let degree = metrics.degree_centrality(EgoScope::WithoutEgo);
    assert_relative_eq!(degree[&2], 1.0);
    assert_relative_eq!(degree[&3], 0.5);

    let betweenness = metrics.betweenness_centrality(EgoScope::WithoutEgo);
    assert_relative_eq!(betweenness[&2], 1.0);
    assert_relative_eq!(betweenness[&4], 0.0);

    let closeness = metrics.closeness_centrality(EgoScope::WithoutEgo);
    assert_relative_eq!(closeness[&2], 1.0);
    assert_relative_eq!(closeness[&3], 2.0 / 3.0, epsilon = 1e-12);

    // Sentinels stay out of the mean.
    assert_relative_eq!(average_centrality(&degree).unwrap(), 2.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn ego_dominates_full_graph_centrality() {
    let net = network();
    let metrics = net.metrics();
    let degree = metrics.degree_centrality(EgoScope::WithEgo);
    assert_relative_eq!(degree[&1], 1.0);
    assert_relative_eq!(degree[&5], 0.25);

    let eigen = metrics
        .centrality(CentralityKind::Eigenvector, EgoScope::WithEgo)
        .unwrap();
    let top = eigen
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(id, _)| *id);
    assert_eq!(top, Some(1));

    assert_relative_eq!(
        metrics
            .centrality_of(CentralityKind::Degree, EgoScope::WithEgo, "Bea")
            .unwrap(),
        0.75
    );
    assert!(matches!(
        metrics.centrality_of(CentralityKind::Degree, EgoScope::WithEgo, "Zed"),
        Err(EgoNetError::UnknownNode(_))
    ));
    // The ego exists but is not part of the ego-free view.
    assert!(matches!(
        metrics.centrality_of(CentralityKind::Degree, EgoScope::WithoutEgo, 1u64),
        Err(EgoNetError::UnknownNode(_))
    ));

    let named = metrics.resolve_names(&degree).unwrap();
    assert_relative_eq!(named["Me"], 1.0);
}

#[test]
fn eigenvector_reports_non_convergence() {
    let net = network();
    let config = AnalysisConfig {
        eigenvector_max_iterations: 1,
        ..AnalysisConfig::default()
    };
    let metrics = net.metrics_with(config);
    assert!(matches!(
        metrics.centrality(CentralityKind::Eigenvector, EgoScope::WithEgo),
        Err(EgoNetError::Convergence { iterations: 1 })
    ));
    assert!(metrics
        .eigenvector_centrality(EgoScope::WithEgo, 500)
        .is_ok());
}

#[test]
fn gender_breakdown_includes_the_ego() {
    let net = network();
    let breakdown = net.metrics().attribute_breakdown("gender").unwrap();
    assert_eq!(breakdown.sample_size, 5);
    assert_relative_eq!(breakdown.share("female"), 0.6);
    assert_relative_eq!(breakdown.share("male"), 0.4);
    assert_relative_eq!(breakdown.share("unspecified"), 0.0);
    let total: f64 = breakdown.shares().values().sum();
    assert_relative_eq!(total, 1.0);
}

#[test]
fn attribute_by_attribute_and_context_breakdowns() {
    let mut net = network();
    let school = net.register_context("Hill High", ContextCategory::School);
    net.code_known_from("Bea", school).unwrap();
    net.code_known_from("Dot", school).unwrap();
    net.set_attribute("Bea", "Religion", 2i64).unwrap();

    let metrics = net.metrics();
    let by_context = metrics.context_breakdown(school, "gender").unwrap();
    assert_eq!(by_context.sample_size, 2);
    assert_relative_eq!(by_context.share("female"), 0.5);

    let males = metrics
        .attribute_by_attribute("gender", &AttributeValue::from("male"), "known from")
        .unwrap();
    assert_eq!(males.sample_size, 2);
    assert_eq!(males.counts[&None], 1);
    assert_eq!(males.counts[&Some(AttributeValue::Int(school as i64))], 1);

    let religion = metrics.attribute_breakdown("religion").unwrap();
    assert_relative_eq!(religion.share(2i64), 0.2);

    assert!(matches!(
        metrics.context_breakdown(99, "gender"),
        Err(EgoNetError::UnknownContext(99))
    ));
    assert!(matches!(
        metrics.attribute_breakdown("eye colour"),
        Err(EgoNetError::InvalidAttribute(_))
    ));
}

#[test]
fn homophily_scores_alters_against_mutuals_and_ego() {
    let net = network();
    let shares = net.metrics().associativity_by_attribute("gender").unwrap();
    // Bea: Cal matches, Dot does not, ego matches -> 2/3. Cal: Bea and ego -> 1.
    assert_relative_eq!(shares[&AttributeValue::from("female")], 5.0 / 6.0, epsilon = 1e-12);
    // Dot matches nobody; Eve has no roster mutuals and contributes 0.
    assert_relative_eq!(shares[&AttributeValue::from("male")], 0.0);
    for share in shares.values() {
        assert!((0.0..=1.0).contains(share));
    }
}

#[test]
fn clustering_over_each_group() {
    let mut net = network();
    let metrics = net.metrics();

    let whole = metrics.clustering(ClusterGroup::WholeGraph).unwrap();
    assert_relative_eq!(whole[&1], 1.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(whole[&2], 2.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(whole[&3], 1.0);
    assert_relative_eq!(whole[&5], 0.0);

    let ego_free = metrics
        .clustering(ClusterGroup::from_selector(-1).unwrap())
        .unwrap();
    assert!(!ego_free.contains_key(&1));
    assert_eq!(ego_free.len(), 4);
    // Triangles through the ego still count; only the ego's own entry goes.
    for id in 2..=5u64 {
        assert_relative_eq!(ego_free[&id], whole[&id]);
    }
    assert_relative_eq!(
        metrics
            .average_clustering(ClusterGroup::WithoutEgo)
            .unwrap()
            .unwrap(),
        (2.0 / 3.0 + 1.0 + 1.0 + 0.0) / 4.0,
        epsilon = 1e-12
    );

    let school = net.register_context("Hill High", ContextCategory::School);
    net.code_known_from(2u64, school).unwrap();
    net.code_known_from(3u64, school).unwrap();
    let in_school = net
        .metrics()
        .clustering(ClusterGroup::from_selector(school as i64).unwrap())
        .unwrap();
    assert_eq!(in_school.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    assert_relative_eq!(in_school[&3], 1.0);

    assert!(matches!(
        net.metrics().clustering(ClusterGroup::Context(42)),
        Err(EgoNetError::UnknownContext(42))
    ));
    assert!(ClusterGroup::from_selector(-7).is_err());
}

#[test]
fn clustering_by_attribute_partitions_roster() {
    let net = network();
    let metrics = net.metrics();
    let by_gender = metrics.clustering_by_attribute("gender").unwrap();
    let female = &by_gender[&Some(AttributeValue::from("female"))];
    assert_eq!(female.len(), 3);
    let male = &by_gender[&Some(AttributeValue::from("male"))];
    assert_relative_eq!(male[&4], 1.0);
    assert_relative_eq!(male[&5], 0.0);

    let summary = metrics.clustering_by_attribute_summary("gender").unwrap();
    assert_relative_eq!(summary[&Some(AttributeValue::from("male"))], 0.5);

    for column in ["id", "mutuals", "shoe size"] {
        assert!(matches!(
            metrics.clustering_by_attribute(column),
            Err(EgoNetError::InvalidAttribute(_))
        ));
    }
}

#[test]
fn structural_summaries() {
    let net = network();
    let metrics = net.metrics();

    assert_eq!(metrics.degree("Bea").unwrap(), 3);
    assert_eq!(metrics.degree(5u64).unwrap(), 1);
    assert!(matches!(
        metrics.degree("Nobody"),
        Err(EgoNetError::UnknownNode(_))
    ));

    assert_relative_eq!(metrics.average_degree(EgoScope::WithEgo).unwrap(), 2.4);
    assert_relative_eq!(
        metrics.average_degree(EgoScope::WithoutEgo).unwrap(),
        4.0 / 3.0,
        epsilon = 1e-12
    );
    assert_relative_eq!(metrics.density(EgoScope::WithEgo), 0.6);

    assert_eq!(metrics.component_count(EgoScope::WithEgo), 1);
    assert_eq!(metrics.component_count(EgoScope::WithoutEgo), 2);

    assert_eq!(metrics.diameter(EgoScope::WithEgo).unwrap(), 2);
    assert_eq!(metrics.diameter(EgoScope::WithoutEgo).unwrap(), 2);
    assert_relative_eq!(
        metrics.average_path_length(EgoScope::WithoutEgo).unwrap(),
        4.0 / 3.0,
        epsilon = 1e-12
    );
}

#[test]
fn path_metrics_reject_disconnected_views() {
    let mut net = network();
    net.add_alter(Person::new(6, "Fay")).unwrap();
    net.add_alter(Person::new(7, "Gil")).unwrap();
    net.add_direct_edge(6, 7).unwrap();

    let metrics = net.metrics();
    assert!(metrics.average_path_length(EgoScope::WithEgo).is_ok());
    assert!(matches!(
        metrics.average_path_length(EgoScope::WithoutEgo),
        Err(EgoNetError::Disconnected(_))
    ));
    assert!(matches!(
        metrics.diameter(EgoScope::WithoutEgo),
        Err(EgoNetError::Disconnected(_))
    ));
}
