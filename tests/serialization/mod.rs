//! # Handing observations to a consumer
//!
//! Observations are serialized to MessagePack, which keeps the `NaN` of undefined features intact.
use std::collections::BTreeSet;

use proptest::prelude::*;

use relp_observation::data::linear_algebra::matrix::{CooMatrix, DenseMatrix, ShapeError};
use relp_observation::observation::{
    AnyObservationFunction, Observation, ObservationConfig, ObservationFunction,
};

use crate::episode::{down_child, root, solved};

fn round_trip(observation: &Observation) -> Observation {
    let bytes = rmp_serde::to_vec(observation).unwrap();
    rmp_serde::from_slice(&bytes).unwrap()
}

fn same_bits(left: &[f64], right: &[f64]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.to_bits() == b.to_bits())
}

fn identical(left: &DenseMatrix, right: &DenseMatrix) -> bool {
    left.is_identical_to(right)
}

fn both<T>(left: &Option<T>, right: &Option<T>, same: impl Fn(&T, &T) -> bool) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => same(left, right),
        (None, None) => true,
        _ => false,
    }
}

#[test]
fn observations_survive_a_round_trip() {
    let configs = [
        ObservationConfig::NodeBipartite { cache: false },
        ObservationConfig::MilpBipartite { normalize: true },
        ObservationConfig::StrongBranchingScores { pseudo_candidates: false },
        ObservationConfig::Pseudocosts,
        ObservationConfig::Khalil2016 { pseudo_candidates: true },
        ObservationConfig::Hutter2011,
        ObservationConfig::FocusNode,
        ObservationConfig::Weight,
    ];

    // The solved model has no LP, so part of the last observations is missing
    for (model, done) in [(root(), false), (down_child(), false), (solved(), true)] {
        for config in configs.clone() {
            let mut function = AnyObservationFunction::from(config);
            function.reset(&model).unwrap();
            let observation = function.extract(&model, done).unwrap();

            let copy = round_trip(&observation);
            let survived = match (&observation, &copy) {
                (Observation::NodeBipartite(left), Observation::NodeBipartite(right)) => {
                    both(left, right, |left, right| {
                        identical(&left.variable_features, &right.variable_features)
                            && identical(&left.row_features, &right.row_features)
                            && left.edge_features == right.edge_features
                    })
                }
                (Observation::MilpBipartite(left), Observation::MilpBipartite(right)) => {
                    identical(&left.variable_features, &right.variable_features)
                        && identical(&left.constraint_features, &right.constraint_features)
                        && left.edge_features == right.edge_features
                }
                (Observation::Khalil2016(left), Observation::Khalil2016(right)) => {
                    both(left, right, |left, right| identical(&left.features, &right.features))
                }
                (Observation::Hutter2011(left), Observation::Hutter2011(right)) => {
                    both(left, right, |left, right| same_bits(&left.features, &right.features))
                }
                (Observation::StrongBranchingScores(left), Observation::StrongBranchingScores(right))
                | (Observation::Pseudocosts(left), Observation::Pseudocosts(right)) => {
                    both(left, right, |left, right| same_bits(left, right))
                }
                (Observation::Weight(left), Observation::Weight(right)) => same_bits(left, right),
                (Observation::FocusNode(left), Observation::FocusNode(right)) => left == right,
                _ => false,
            };
            assert!(survived, "{} changed in a round trip", function.name());
        }
    }
}

#[test]
fn weight_of_a_non_knapsack() {
    let model = root();
    let mut function = AnyObservationFunction::from(ObservationConfig::Weight);
    function.reset(&model).unwrap();
    // Covering constraints, not a knapsack
    let observation = function.extract(&model, true).unwrap();
    assert_eq!(observation, Observation::Weight(vec![0f64; 3]));
    assert_eq!(round_trip(&observation), observation);
}

#[test]
fn malformed_sparse_matrix_is_rejected() {
    // (values, indices, shape) with a repeated coordinate
    let duplicate = (vec![1f64, 2f64], vec![vec![0usize, 0], vec![1usize, 1]], vec![2usize, 2]);
    let bytes = rmp_serde::to_vec(&duplicate).unwrap();
    assert!(rmp_serde::from_slice::<CooMatrix<f64>>(&bytes).is_err());

    let out_of_bounds = (vec![1f64], vec![vec![2usize], vec![0usize]], vec![2usize, 2]);
    let bytes = rmp_serde::to_vec(&out_of_bounds).unwrap();
    assert!(rmp_serde::from_slice::<CooMatrix<f64>>(&bytes).is_err());

    let valid = (vec![1f64], vec![vec![1usize], vec![0usize]], vec![2usize, 2]);
    let bytes = rmp_serde::to_vec(&valid).unwrap();
    let matrix = rmp_serde::from_slice::<CooMatrix<f64>>(&bytes).unwrap();
    assert_eq!(matrix.coordinate(0), vec![1, 0]);
}

fn sparse_matrix() -> impl Strategy<Value = (Vec<(usize, usize)>, Vec<f64>, (usize, usize))> {
    (1usize..8, 1usize..8).prop_flat_map(|(nr_rows, nr_columns)| {
        prop::collection::btree_set((0..nr_rows, 0..nr_columns), 0..=nr_rows * nr_columns / 2)
            .prop_flat_map(move |coordinates: BTreeSet<(usize, usize)>| {
                let nnz = coordinates.len();
                (
                    Just(coordinates.into_iter().collect::<Vec<_>>()),
                    prop::collection::vec(
                        prop_oneof![-1e6f64..-1e-3, 1e-3f64..1e6],
                        nnz,
                    ),
                    Just((nr_rows, nr_columns)),
                )
            })
    })
}

proptest! {
    #[test]
    fn sparse_matrix_holds_its_triplets((coordinates, values, shape) in sparse_matrix()) {
        let triplets = coordinates.iter().zip(&values).map(|(&(i, j), &value)| (i, j, value));
        let matrix = CooMatrix::from_triplets(triplets, shape).unwrap();

        prop_assert_eq!(matrix.nnz(), values.len());
        prop_assert_eq!(matrix.shape(), &[shape.0, shape.1][..]);
        prop_assert!(matrix.indices().iter().all(|row| row.len() == matrix.nnz()));
        let stored = matrix.triplets().map(|(i, j, &value)| ((i, j), value)).collect::<Vec<_>>();
        let expected = coordinates.iter().copied().zip(values.iter().copied()).collect::<Vec<_>>();
        prop_assert_eq!(stored, expected);

        let bytes = rmp_serde::to_vec(&matrix).unwrap();
        let copy: CooMatrix<f64> = rmp_serde::from_slice(&bytes).unwrap();
        prop_assert_eq!(copy, matrix);
    }

    #[test]
    fn repeated_coordinate_is_rejected((coordinates, values, shape) in sparse_matrix()) {
        prop_assume!(!coordinates.is_empty());
        let triplets = coordinates.iter()
            .zip(&values)
            .map(|(&(i, j), &value)| (i, j, value))
            .chain(std::iter::once((coordinates[0].0, coordinates[0].1, values[0])));

        prop_assert_eq!(
            CooMatrix::from_triplets(triplets, shape),
            Err(ShapeError::Duplicate { coordinate: vec![coordinates[0].0, coordinates[0].1] }),
        );
    }
}
