//! # Branching candidate features of Khalil et al. (2016)
//!
//! From "Learning to branch in mixed integer programming". Every branching candidate is described
//! by a fixed set of features, some of which only depend on the structure of the LP at the start of
//! the episode (the static features) and some of which depend on the current node (the dynamic
//! features).
//!
//! The static features are computed on reset from the LP rows and kept per variable for the rest of
//! the episode. Coefficients are read with the rows oriented as `a x <= b`.
use std::collections::HashMap;

use enum_map::{Enum, EnumMap};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::statistics::Summary;
use crate::algorithm::utilities::{fractional_part, ratio};
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::model::{
    BranchDirection, BranchingHistory, CandidateKind, Model, Row, RowIndex, Variable, VariableId,
    VariableIndex,
};
use crate::observation::{
    Episode, indexed_variables, NOT_APPLICABLE, ObservationError, ObservationFunction, unless_finished,
};
use crate::observation::bipartite::Orientation;
use crate::observation::candidates::indexed_candidates;

/// Number of features that are computed once per episode.
const NR_STATIC_FEATURES: usize = 18;
/// Number of features that are computed at every extraction.
const NR_DYNAMIC_FEATURES: usize = 54;

/// Columns of the feature matrix.
///
/// The static features come first.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Khalil2016Feature {
    // static
    ObjCoef,
    ObjCoefPosPart,
    ObjCoefNegPart,
    NRows,
    RowsDegMean,
    RowsDegStddev,
    RowsDegMin,
    RowsDegMax,
    RowsPosCoefsCount,
    RowsPosCoefsMean,
    RowsPosCoefsStddev,
    RowsPosCoefsMin,
    RowsPosCoefsMax,
    RowsNegCoefsCount,
    RowsNegCoefsMean,
    RowsNegCoefsStddev,
    RowsNegCoefsMin,
    RowsNegCoefsMax,
    // dynamic
    Slack,
    CeilDist,
    PseudocostUp,
    PseudocostDown,
    PseudocostRatio,
    PseudocostSum,
    PseudocostProduct,
    NCutoffUp,
    NCutoffDown,
    NCutoffUpRatio,
    NCutoffDownRatio,
    RowsDynamicDegMean,
    RowsDynamicDegStddev,
    RowsDynamicDegMin,
    RowsDynamicDegMax,
    RowsDynamicDegMeanRatio,
    RowsDynamicDegMinRatio,
    RowsDynamicDegMaxRatio,
    CoefPosRhsRatioMin,
    CoefPosRhsRatioMax,
    CoefNegRhsRatioMin,
    CoefNegRhsRatioMax,
    PosCoefPosCoefRatioMin,
    PosCoefPosCoefRatioMax,
    PosCoefNegCoefRatioMin,
    PosCoefNegCoefRatioMax,
    NegCoefPosCoefRatioMin,
    NegCoefPosCoefRatioMax,
    NegCoefNegCoefRatioMin,
    NegCoefNegCoefRatioMax,
    ActiveCoefWeight1Count,
    ActiveCoefWeight1Sum,
    ActiveCoefWeight1Mean,
    ActiveCoefWeight1Stddev,
    ActiveCoefWeight1Min,
    ActiveCoefWeight1Max,
    ActiveCoefWeight2Count,
    ActiveCoefWeight2Sum,
    ActiveCoefWeight2Mean,
    ActiveCoefWeight2Stddev,
    ActiveCoefWeight2Min,
    ActiveCoefWeight2Max,
    ActiveCoefWeight3Count,
    ActiveCoefWeight3Sum,
    ActiveCoefWeight3Mean,
    ActiveCoefWeight3Stddev,
    ActiveCoefWeight3Min,
    ActiveCoefWeight3Max,
    ActiveCoefWeight4Count,
    ActiveCoefWeight4Sum,
    ActiveCoefWeight4Mean,
    ActiveCoefWeight4Stddev,
    ActiveCoefWeight4Min,
    ActiveCoefWeight4Max,
}

impl Khalil2016Feature {
    /// Whether the feature is computed once per episode.
    #[must_use]
    pub fn is_static(self) -> bool {
        self.into_usize() < NR_STATIC_FEATURES
    }
}

/// Statistics over the tight rows that a candidate appears in, one set per weighting of the rows.
///
/// The weights are: one, the inverse of the sum of absolute coefficients in the row, the inverse of
/// the sum of absolute coefficients of candidates in the row and the absolute dual value.
const ACTIVE_COEF_WEIGHTS: [[Khalil2016Feature; 6]; 4] = {
    use Khalil2016Feature::*;
    [
        [
            ActiveCoefWeight1Count, ActiveCoefWeight1Sum, ActiveCoefWeight1Mean,
            ActiveCoefWeight1Stddev, ActiveCoefWeight1Min, ActiveCoefWeight1Max,
        ],
        [
            ActiveCoefWeight2Count, ActiveCoefWeight2Sum, ActiveCoefWeight2Mean,
            ActiveCoefWeight2Stddev, ActiveCoefWeight2Min, ActiveCoefWeight2Max,
        ],
        [
            ActiveCoefWeight3Count, ActiveCoefWeight3Sum, ActiveCoefWeight3Mean,
            ActiveCoefWeight3Stddev, ActiveCoefWeight3Min, ActiveCoefWeight3Max,
        ],
        [
            ActiveCoefWeight4Count, ActiveCoefWeight4Sum, ActiveCoefWeight4Mean,
            ActiveCoefWeight4Stddev, ActiveCoefWeight4Min, ActiveCoefWeight4Max,
        ],
    ]
};

/// Features of all variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Khalil2016Observation {
    /// One row per variable and one column per `Khalil2016Feature`. Rows of variables that are not
    /// a candidate are `NOT_APPLICABLE`.
    pub features: DenseMatrix,
}

impl Khalil2016Observation {
    /// Number of leading columns that are computed once per episode.
    pub const NR_STATIC_FEATURES: usize = NR_STATIC_FEATURES;
    /// Number of trailing columns that are computed at every extraction.
    pub const NR_DYNAMIC_FEATURES: usize = NR_DYNAMIC_FEATURES;
    /// Total number of columns.
    pub const NR_FEATURES: usize = NR_STATIC_FEATURES + NR_DYNAMIC_FEATURES;

    /// Value of a feature of the variable with index `i`.
    #[must_use]
    pub fn feature(&self, i: usize, feature: Khalil2016Feature) -> f64 {
        self.features.get_value(i, feature.into_usize())
    }
}

/// Extracts a `Khalil2016Observation`.
#[derive(Clone, Debug, Default)]
pub struct Khalil2016 {
    candidates: CandidateKind,
    /// Static features per variable.
    episode: Episode<HashMap<VariableId, [f64; NR_STATIC_FEATURES]>>,
}

impl Khalil2016 {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `pseudo_candidates`: Whether to describe the pseudo candidates instead of the LP
    /// candidates.
    #[must_use]
    pub fn new(pseudo_candidates: bool) -> Self {
        Self { candidates: CandidateKind::from_pseudo_flag(pseudo_candidates), episode: Episode::default() }
    }
}

impl ObservationFunction for Khalil2016 {
    /// `None` when the solve finished before the last extraction.
    type Observation = Option<Khalil2016Observation>;
    const NAME: &'static str = "khalil2016";

    fn reset<M: Model + ?Sized>(&mut self, model: &M) -> Result<(), ObservationError> {
        self.episode.clear();

        let (index, variables) = indexed_variables(model)?;
        let lp = OrientedRows::query(model, &index)?;
        let statics = variables.iter()
            .zip(&lp.incidence)
            .map(|(variable, entries)| (variable.id, static_features(variable, entries, &lp.rows)))
            .collect::<HashMap<_, _>>();

        debug!("{}: computed static features of {} variables", Self::NAME, statics.len());
        self.episode.start(statics);
        Ok(())
    }

    fn extract<M: Model + ?Sized>(
        &mut self,
        model: &M,
        done: bool,
    ) -> Result<Self::Observation, ObservationError> {
        let statics = self.episode.ready(Self::NAME)?;

        let observation = unless_finished(Self::NAME, done, observe(model, self.candidates, statics))?;
        debug!("{}: extracted {:?} candidates (done: {})", Self::NAME, self.candidates, done);
        Ok(observation)
    }
}

/// Features of the candidates at the current node.
///
/// * `statics`: Static features by variable, computed at reset.
fn observe<M: Model + ?Sized>(
    model: &M,
    candidates: CandidateKind,
    statics: &HashMap<VariableId, [f64; NR_STATIC_FEATURES]>,
) -> Result<Khalil2016Observation, ObservationError> {
    let (index, variables) = indexed_variables(model)?;
    let candidates = indexed_candidates(model, candidates, &index)?;
    let lp = OrientedRows::query(model, &index)?;
    let mut values = vec![NOT_APPLICABLE; index.len()];
    for column in model.lp_columns()? {
        values[index.require(column.variable, "variable of LP column")?] = column.solution_value;
    }

    let is_candidate = {
        let mut flags = vec![false; index.len()];
        for &(i, _) in &candidates {
            flags[i] = true;
        }
        flags
    };
    let row_data = lp.rows.iter()
        .zip(&lp.oriented)
        .map(|(row, oriented)| RowData::new(row, oriented, &is_candidate, &variables))
        .collect::<Vec<_>>();

    let mut features = DenseMatrix::filled(index.len(), Khalil2016Feature::LENGTH, NOT_APPLICABLE);
    for (i, variable) in candidates {
        let mut row: EnumMap<Khalil2016Feature, f64> = EnumMap::from_fn(|_| NOT_APPLICABLE);
        let cached = match statics.get(&variable) {
            Some(cached) => *cached,
            // Not seen at reset, described by the current rows instead
            None => static_features(&variables[i], &lp.incidence[i], &lp.rows),
        };
        row.as_mut_slice()[..NR_STATIC_FEATURES].copy_from_slice(&cached);

        let history = model.branching_history(variable)?;
        dynamic_features(&mut row, values[i], &history, &lp.incidence[i], &row_data);
        features.row_mut(i).copy_from_slice(row.as_slice());
    }

    Ok(Khalil2016Observation { features })
}

/// LP rows in index order, oriented as `a x <= b`.
struct OrientedRows {
    rows: Vec<Row>,
    /// Per row, its orientation and its oriented coefficients by variable index.
    oriented: Vec<(Orientation, Vec<(usize, f64)>)>,
    /// Per variable, the rows it appears in with its oriented coefficient.
    incidence: Vec<Vec<(usize, f64)>>,
}

impl OrientedRows {
    fn query<M: Model + ?Sized>(model: &M, index: &VariableIndex) -> Result<Self, ObservationError> {
        let (_, rows) = RowIndex::order(model.lp_rows()?)?;

        let mut oriented = Vec::with_capacity(rows.len());
        let mut incidence = vec![Vec::new(); index.len()];
        for (r, row) in rows.iter().enumerate() {
            let orientation = Orientation::of(row.lhs, row.rhs);
            let mut coefficients = Vec::with_capacity(row.coefficients.len());
            for &(variable, value) in &row.coefficients {
                let j = index.require(variable, "variable in row")?;
                coefficients.push((j, orientation.sign * value));
                incidence[j].push((r, orientation.sign * value));
            }
            oriented.push((orientation, coefficients));
        }

        Ok(Self { rows, oriented, incidence })
    }
}

/// Aggregates of a single row used by the dynamic features.
struct RowData {
    /// Oriented right-hand side.
    bias: f64,
    is_tight: bool,
    dual_value: f64,
    positive_sum: f64,
    /// Sum of the absolute values of the negative coefficients.
    negative_sum: f64,
    absolute_sum: f64,
    candidate_absolute_sum: f64,
    /// Number of variables in the row that are not fixed at the node.
    dynamic_degree: usize,
}

impl RowData {
    fn new(
        row: &Row,
        (orientation, coefficients): &(Orientation, Vec<(usize, f64)>),
        is_candidate: &[bool],
        variables: &[Variable],
    ) -> Self {
        let positive_sum = coefficients.iter().map(|&(_, value)| value.max(0f64)).sum::<f64>();
        let negative_sum = coefficients.iter().map(|&(_, value)| (-value).max(0f64)).sum::<f64>();
        let candidate_absolute_sum = coefficients.iter()
            .filter(|&&(j, _)| is_candidate[j])
            .map(|&(_, value)| value.abs())
            .sum();
        let dynamic_degree = coefficients.iter().filter(|&&(j, _)| !variables[j].is_fixed()).count();

        Self {
            bias: orientation.bias(row.constant),
            is_tight: orientation.is_tight(row.activity),
            dual_value: row.dual_value,
            positive_sum,
            negative_sum,
            absolute_sum: positive_sum + negative_sum,
            candidate_absolute_sum,
            dynamic_degree,
        }
    }
}

/// Features of a variable that only depend on the structure of the LP.
///
/// # Arguments
///
/// * `entries`: The rows the variable appears in, with its oriented coefficient.
/// * `rows`: All rows.
fn static_features(
    variable: &Variable,
    entries: &[(usize, f64)],
    rows: &[Row],
) -> [f64; NR_STATIC_FEATURES] {
    use Khalil2016Feature::*;

    let mut features: EnumMap<Khalil2016Feature, f64> = EnumMap::from_fn(|_| NOT_APPLICABLE);
    features[ObjCoef] = variable.objective;
    features[ObjCoefPosPart] = variable.objective.max(0f64);
    features[ObjCoefNegPart] = (-variable.objective).max(0f64);
    features[NRows] = entries.len() as f64;

    let degrees = Summary::of(entries.iter().map(|&(r, _)| rows[r].coefficients.len() as f64));
    features[RowsDegMean] = degrees.mean;
    features[RowsDegStddev] = degrees.stddev;
    features[RowsDegMin] = degrees.min;
    features[RowsDegMax] = degrees.max;

    let positive = Summary::of(entries.iter().map(|&(_, value)| value).filter(|&value| value > 0f64));
    features[RowsPosCoefsCount] = positive.count as f64;
    features[RowsPosCoefsMean] = positive.mean;
    features[RowsPosCoefsStddev] = positive.stddev;
    features[RowsPosCoefsMin] = positive.min;
    features[RowsPosCoefsMax] = positive.max;

    let negative = Summary::of(entries.iter().map(|&(_, value)| value).filter(|&value| value < 0f64));
    features[RowsNegCoefsCount] = negative.count as f64;
    features[RowsNegCoefsMean] = negative.mean;
    features[RowsNegCoefsStddev] = negative.stddev;
    features[RowsNegCoefsMin] = negative.min;
    features[RowsNegCoefsMax] = negative.max;

    let mut statics = [NOT_APPLICABLE; NR_STATIC_FEATURES];
    statics.copy_from_slice(&features.as_slice()[..NR_STATIC_FEATURES]);
    statics
}

/// Fill the dynamic features of a candidate.
///
/// # Arguments
///
/// * `features`: Row of the candidate, with the static features filled in.
/// * `value`: Value of the candidate in the LP solution, `NOT_APPLICABLE` without a column.
/// * `entries`: The rows the candidate appears in, with its oriented coefficient.
/// * `rows`: Aggregates of all rows.
fn dynamic_features(
    features: &mut EnumMap<Khalil2016Feature, f64>,
    value: f64,
    history: &BranchingHistory,
    entries: &[(usize, f64)],
    rows: &[RowData],
) {
    use Khalil2016Feature::*;

    let fraction = if value.is_nan() { NOT_APPLICABLE } else { fractional_part(value) };
    features[Slack] = fraction.min(1f64 - fraction);
    features[CeilDist] = if fraction == 0f64 { 0f64 } else { 1f64 - fraction };

    let pseudocost = |direction: BranchDirection| history.pseudocost[direction].unwrap_or(NOT_APPLICABLE);
    let down = pseudocost(BranchDirection::Down) * fraction;
    let up = pseudocost(BranchDirection::Up) * (1f64 - fraction);
    features[PseudocostUp] = up;
    features[PseudocostDown] = down;
    features[PseudocostRatio] = ratio(up, down);
    features[PseudocostSum] = up + down;
    features[PseudocostProduct] = up * down;

    features[NCutoffUp] = history.nr_cutoffs[BranchDirection::Up];
    features[NCutoffDown] = history.nr_cutoffs[BranchDirection::Down];
    features[NCutoffUpRatio] = ratio(
        history.nr_cutoffs[BranchDirection::Up],
        history.nr_branchings[BranchDirection::Up] as f64,
    );
    features[NCutoffDownRatio] = ratio(
        history.nr_cutoffs[BranchDirection::Down],
        history.nr_branchings[BranchDirection::Down] as f64,
    );

    let degrees = Summary::of(entries.iter().map(|&(r, _)| rows[r].dynamic_degree as f64));
    features[RowsDynamicDegMean] = degrees.mean;
    features[RowsDynamicDegStddev] = degrees.stddev;
    features[RowsDynamicDegMin] = degrees.min;
    features[RowsDynamicDegMax] = degrees.max;
    features[RowsDynamicDegMeanRatio] = ratio(degrees.mean, features[RowsDegMean]);
    features[RowsDynamicDegMinRatio] = ratio(degrees.min, features[RowsDegMin]);
    features[RowsDynamicDegMaxRatio] = ratio(degrees.max, features[RowsDegMax]);

    let rhs_ratios = |positive: bool| Summary::of(
        entries.iter()
            .map(|&(r, coefficient)| (coefficient, rows[r].bias))
            .filter(|&(_, bias)| if positive { bias > 0f64 } else { bias < 0f64 })
            .map(|(coefficient, bias)| coefficient / bias)
    );
    let positive_rhs = rhs_ratios(true);
    let negative_rhs = rhs_ratios(false);
    features[CoefPosRhsRatioMin] = positive_rhs.min;
    features[CoefPosRhsRatioMax] = positive_rhs.max;
    features[CoefNegRhsRatioMin] = negative_rhs.min;
    features[CoefNegRhsRatioMax] = negative_rhs.max;

    // Share of the candidate's coefficient in the positive and negative parts of its rows
    let coefficient_ratios = |positive: bool, of_positive: bool| Summary::of(
        entries.iter()
            .filter(|&&(_, coefficient)| if positive { coefficient > 0f64 } else { coefficient < 0f64 })
            .map(|&(r, coefficient)| {
                let total = if of_positive { rows[r].positive_sum } else { rows[r].negative_sum };
                ratio(coefficient.abs(), total)
            })
    );
    for (positive, of_positive, [min, max]) in [
        (true, true, [PosCoefPosCoefRatioMin, PosCoefPosCoefRatioMax]),
        (true, false, [PosCoefNegCoefRatioMin, PosCoefNegCoefRatioMax]),
        (false, true, [NegCoefPosCoefRatioMin, NegCoefPosCoefRatioMax]),
        (false, false, [NegCoefNegCoefRatioMin, NegCoefNegCoefRatioMax]),
    ] {
        let summary = coefficient_ratios(positive, of_positive);
        features[min] = summary.min;
        features[max] = summary.max;
    }

    let active = entries.iter().map(|&(r, _)| &rows[r]).filter(|row| row.is_tight).collect::<Vec<_>>();
    let weights: [fn(&RowData) -> f64; 4] = [
        |_| 1f64,
        |row| ratio(1f64, row.absolute_sum),
        |row| ratio(1f64, row.candidate_absolute_sum),
        |row| row.dual_value.abs(),
    ];
    for (weight, [count, sum, mean, stddev, min, max]) in weights.into_iter().zip(ACTIVE_COEF_WEIGHTS) {
        let summary = Summary::of(active.iter().map(|row| weight(row)));
        features[count] = summary.count as f64;
        features[sum] = summary.sum;
        features[mean] = summary.mean;
        features[stddev] = summary.stddev;
        features[min] = summary.min;
        features[max] = summary.max;
    }
}
