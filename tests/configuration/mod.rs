//! # Observation functions chosen by a configuration file
use relp_observation::observation::{
    AnyObservationFunction, Observation, ObservationConfig, ObservationError, ObservationFunction,
};

use crate::episode::{down_child, recording, root};

#[test]
fn parse() {
    let config: ObservationConfig = serde_json::from_str(r#"{"kind": "node_bipartite", "cache": true}"#).unwrap();
    assert_eq!(config, ObservationConfig::NodeBipartite { cache: true });

    let config: ObservationConfig = serde_json::from_str(r#"{"kind": "strong_branching_scores"}"#).unwrap();
    assert_eq!(config, ObservationConfig::StrongBranchingScores { pseudo_candidates: false });

    let config: ObservationConfig = serde_json::from_str(r#"{"kind": "hutter2011"}"#).unwrap();
    assert_eq!(config, ObservationConfig::Hutter2011);
}

#[test]
fn unknown_kind() {
    assert!(serde_json::from_str::<ObservationConfig>(r#"{"kind": "tree_search"}"#).is_err());
    assert!(serde_json::from_str::<ObservationConfig>(r#"{"cache": true}"#).is_err());
}

#[test]
fn list_of_functions() {
    let configs: Vec<ObservationConfig> = serde_json::from_str(r#"[
        {"kind": "nothing"},
        {"kind": "khalil2016", "pseudo_candidates": true},
        {"kind": "milp_bipartite", "normalize": false},
        {"kind": "focus_node"}
    ]"#).unwrap();

    let text = serde_json::to_string(&configs).unwrap();
    assert_eq!(serde_json::from_str::<Vec<ObservationConfig>>(&text).unwrap(), configs);

    let names = configs.into_iter()
        .map(|config| AnyObservationFunction::from(config).name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["nothing", "khalil2016", "milp_bipartite", "focus_node"]);
}

#[test]
fn configured_episode() {
    let config = serde_json::from_str::<ObservationConfig>(r#"{"kind": "strong_branching_scores"}"#).unwrap();
    let mut function = AnyObservationFunction::from(config);
    let model = recording();

    assert_eq!(
        function.extract(&model, false),
        Err(ObservationError::NotReset { observation: "strong_branching_scores" }),
    );
    function.reset(&model).unwrap();
    assert_eq!(function.extract(&model, false), Ok(Observation::StrongBranchingScores(Some(vec![0.25f64; 3]))));
}

#[test]
fn configured_functions_are_independent() {
    let config = ObservationConfig::NodeBipartite { cache: true };
    let mut first = AnyObservationFunction::from(config.clone());
    let mut second = AnyObservationFunction::from(config);

    let (at_root, in_child) = (root(), down_child());
    first.reset(&at_root).unwrap();
    second.reset(&in_child).unwrap();

    let from_root = first.extract(&at_root, false).unwrap();
    let from_child = second.extract(&in_child, false).unwrap();
    assert_eq!(from_root.nr_variable_rows(), Some(3));
    assert_eq!(from_child.nr_variable_rows(), Some(3));
    match (from_root, from_child) {
        (Observation::NodeBipartite(Some(left)), Observation::NodeBipartite(Some(right))) => {
            assert!(!left.variable_features.is_identical_to(&right.variable_features));
        }
        other => panic!("unexpected observations {:?}", other),
    }
}
