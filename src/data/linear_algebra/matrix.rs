//! # Matrix implementations
//!
//! Two representations are used for observations. Per-entity features are stored densely, one row
//! per entity and one column per feature. Relations between entities, like the coefficients that
//! link variables to constraints, are stored in coordinate format.
pub use coordinate::{CooMatrix, ShapeError};
pub use dense::DenseMatrix;

mod coordinate;
mod dense;
