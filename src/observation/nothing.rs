//! # No observation
//!
//! Used when a control loop requires an observation function but no observation is needed.
use crate::data::model::Model;
use crate::observation::{Episode, ObservationError, ObservationFunction};

/// Extracts the empty observation `()`.
#[derive(Clone, Debug, Default)]
pub struct Nothing {
    episode: Episode<()>,
}

impl Nothing {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObservationFunction for Nothing {
    type Observation = ();
    const NAME: &'static str = "nothing";

    fn reset<M: Model + ?Sized>(&mut self, _model: &M) -> Result<(), ObservationError> {
        self.episode.start(());
        Ok(())
    }

    fn extract<M: Model + ?Sized>(
        &mut self,
        _model: &M,
        _done: bool,
    ) -> Result<Self::Observation, ObservationError> {
        self.episode.ready(Self::NAME).map(|_| ())
    }
}
