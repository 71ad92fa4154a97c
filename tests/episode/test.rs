use enum_map::Enum;

use relp_observation::observation::{
    FocusNode, Hutter2011, is_not_applicable, Khalil2016, Khalil2016Feature, Khalil2016Observation,
    NodeBipartite, ObservationError, ObservationFunction, Pseudocosts, StrongBranchingScores,
};
use relp_observation::observation::node_bipartite::{RowFeature, VariableFeature};

use super::{recording, root, Unavailable};

fn static_columns(features: &relp_observation::data::linear_algebra::matrix::DenseMatrix) -> Vec<u64> {
    let columns = [
        VariableFeature::Objective,
        VariableFeature::IsTypeBinary,
        VariableFeature::IsTypeInteger,
        VariableFeature::IsTypeImplicitInteger,
        VariableFeature::IsTypeContinuous,
    ];
    features.rows()
        .flat_map(|row| columns.iter().map(move |feature| row[feature.into_usize()].to_bits()))
        .collect()
}

#[test]
fn node_bipartite_over_an_episode() {
    let model = recording();
    let mut function = NodeBipartite::new(true);
    function.reset(&model).unwrap();

    let at_root = function.extract(&model, false).unwrap().unwrap();
    assert_eq!(at_root.variable_features.nr_rows(), 3);
    assert_eq!(at_root.row_features.nr_rows(), 3);
    assert_eq!(at_root.edge_features.nnz(), 6);
    let bias = at_root.row_features.column(RowFeature::Bias.into_usize());
    assert!(bias.iter().all(|&value| value == -1f64 / 2f64.sqrt()));

    assert!(!model.advance());
    let in_child = function.extract(&model, false).unwrap().unwrap();
    assert_eq!(static_columns(&at_root.variable_features), static_columns(&in_child.variable_features));
    assert_eq!(at_root.edge_features, in_child.edge_features);
    let solution = in_child.variable_features.column(VariableFeature::SolutionValue.into_usize());
    assert_eq!(solution, vec![0f64, 1f64, 1f64]);
    assert_eq!(in_child.variable_features.get_value(0, VariableFeature::IsSolutionAtUpperBound.into_usize()), 1f64);

    // Without LP at the end of the episode, there is nothing to observe
    assert!(model.advance());
    assert_eq!(function.extract(&model, true), Ok(None));
}

#[test]
fn edges_follow_the_problem_order() {
    let model = root();
    let mut function = NodeBipartite::new(false);
    function.reset(&model).unwrap();
    let edges = function.extract(&model, false).unwrap().unwrap().edge_features;

    let mut coordinates = edges.triplets().map(|(i, j, _)| (i, j)).collect::<Vec<_>>();
    coordinates.sort_unstable();
    assert_eq!(coordinates, vec![(0, 0), (0, 1), (1, 1), (1, 2), (2, 0), (2, 2)]);
    assert_eq!(edges.values().len(), edges.nnz());
    assert!(edges.indices().iter().all(|index_row| index_row.len() == edges.nnz()));
}

#[test]
fn done_does_not_change_the_observation() {
    let model = root();
    let mut function = NodeBipartite::new(true);
    function.reset(&model).unwrap();

    let before = function.extract(&model, false).unwrap().unwrap();
    let last = function.extract(&model, true).unwrap().unwrap();
    assert!(before.variable_features.is_identical_to(&last.variable_features));
    assert!(before.row_features.is_identical_to(&last.row_features));
    assert_eq!(before.edge_features, last.edge_features);
}

#[test]
fn scores_over_an_episode() {
    let model = recording();
    let mut strong_branching = StrongBranchingScores::new(false);
    let mut pseudocosts = Pseudocosts::new();
    strong_branching.reset(&model).unwrap();
    pseudocosts.reset(&model).unwrap();

    assert_eq!(strong_branching.extract(&model, false).unwrap().unwrap(), vec![0.25f64; 3]);
    // Never branched on
    assert!(pseudocosts.extract(&model, false).unwrap().unwrap().into_iter().all(is_not_applicable));

    model.advance();
    // Integral LP solution, no candidates
    assert!(strong_branching.extract(&model, false).unwrap().unwrap().into_iter().all(is_not_applicable));
    assert!(pseudocosts.extract(&model, false).unwrap().unwrap().into_iter().all(is_not_applicable));

    assert!(model.advance());
    assert_eq!(strong_branching.extract(&model, true), Ok(None));
    assert_eq!(pseudocosts.extract(&model, true), Ok(None));
}

#[test]
fn khalil2016_over_an_episode() {
    let model = recording();
    let mut function = Khalil2016::new(true);
    function.reset(&model).unwrap();

    let at_root = function.extract(&model, false).unwrap().unwrap();
    assert_eq!(at_root.features.nr_rows(), 3);
    assert_eq!(at_root.feature(0, Khalil2016Feature::Slack), 0.5f64);
    assert_eq!(at_root.feature(0, Khalil2016Feature::NRows), 2f64);

    model.advance();
    let in_child = function.extract(&model, false).unwrap().unwrap();
    assert_eq!(
        in_child.features.nr_columns(),
        Khalil2016Observation::NR_STATIC_FEATURES + Khalil2016Observation::NR_DYNAMIC_FEATURES,
    );
    // z0 is fixed and no longer a pseudo candidate
    assert!(in_child.features.row(0).iter().all(|&value| is_not_applicable(value)));
    assert_eq!(in_child.feature(1, Khalil2016Feature::Slack), 0f64);
    assert_eq!(in_child.feature(1, Khalil2016Feature::RowsDynamicDegMean), 1.5f64);
    assert_eq!(in_child.feature(1, Khalil2016Feature::RowsDynamicDegMeanRatio), 0.75f64);
    assert_eq!(in_child.feature(2, Khalil2016Feature::RowsDegMean), 2f64);

    assert!(model.advance());
    assert_eq!(function.extract(&model, true), Ok(None));
}

#[test]
fn hutter2011_over_an_episode() {
    let model = recording();
    let mut function = Hutter2011::new();
    function.reset(&model).unwrap();

    assert!(function.extract(&model, false).unwrap().is_some());
    model.advance();
    assert!(function.extract(&model, false).unwrap().is_some());
    assert!(model.advance());
    assert_eq!(function.extract(&model, true), Ok(None));
}

#[test]
fn focus_node_over_an_episode() {
    let model = recording();
    let mut function = FocusNode::new();
    function.reset(&model).unwrap();

    let at_root = function.extract(&model, false).unwrap().unwrap();
    assert_eq!(at_root.number, 1);
    assert_eq!(at_root.nr_lp_candidates, 3);
    assert_eq!(at_root.parent_number, None);

    model.advance();
    let in_child = function.extract(&model, false).unwrap().unwrap();
    assert_eq!(in_child.depth, 1);
    assert_eq!(in_child.parent_number, Some(1));
    assert_eq!(in_child.parent_lower_bound, Some(1.5f64));
    assert_eq!(in_child.nr_pseudo_candidates, 2);

    model.advance();
    assert_eq!(function.extract(&model, true), Ok(None));
}

#[test]
fn model_failures_propagate() {
    let mut node_bipartite = NodeBipartite::new(true);
    node_bipartite.reset(&Unavailable).unwrap();
    match node_bipartite.extract(&Unavailable, false) {
        Err(ObservationError::Model(error)) => assert_eq!(error.description(), "solver is busy"),
        other => panic!("unexpected result {:?}", other),
    }

    let mut khalil = Khalil2016::new(false);
    assert!(matches!(khalil.reset(&Unavailable), Err(ObservationError::Model(_))));
    assert!(matches!(khalil.extract(&root(), false), Err(ObservationError::NotReset { .. })));
}

#[test]
fn sentinel_is_not_equal_to_itself() {
    let model = root();
    let mut function = Pseudocosts::new();
    function.reset(&model).unwrap();
    let scores = function.extract(&model, false).unwrap().unwrap();
    assert!(scores.iter().all(|&value| value != value));
    assert!(scores.iter().all(|&value| is_not_applicable(value + 1f64)));
}
