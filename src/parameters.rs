use crate::AnalysisFlags;
use crate::SimulationError;

/// Settings for one [`crate::Simulation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// Label echoed in reports.
    pub simulation_id: usize,
    /// Size of the founder population.
    pub num_agents: usize,
    /// Reproduction rounds to attempt.
    pub generations: usize,
    /// Each generation has `ceil(growth_rate * parents)` children.
    pub growth_rate: f64,
    /// Reproduce within pairs rather than by drawing any male and female.
    pub monogamous: bool,
    /// How far ahead pairing looks for a partner.
    pub mating_k: usize,
    /// Loci per agent. Zero disables gene tracking.
    pub num_genes: usize,
    /// Probability that one locus of one child mutates.
    pub mutation_rate: f64,
    /// Exclude same-sex, sibling and cousin pairs.
    pub compatible: bool,
    pub analysis: AnalysisFlags,
    /// Seed for the random number generator.
    /// `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            simulation_id: 0,
            num_agents: 100,
            generations: 4,
            growth_rate: 1.01,
            monogamous: true,
            mating_k: 50,
            num_genes: 10,
            mutation_rate: 0.0,
            compatible: true,
            analysis: AnalysisFlags::all(),
            seed: None,
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "growth_rate",
                reason: "must be finite and non-negative",
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SimulationError::InvalidParameter {
                name: "mutation_rate",
                reason: "must lie in [0, 1]",
            });
        }
        if self.mating_k == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "mating_k",
                reason: "must be at least 1",
            });
        }
        self.offspring_count(self.num_agents)?;
        Ok(())
    }

    /// Children to produce from a generation of `parents` agents.
    ///
    /// Fails when `ceil(growth_rate * parents)` is not finite or
    /// does not fit in `usize`.
    pub fn offspring_count(&self, parents: usize) -> Result<usize, SimulationError> {
        let count = (self.growth_rate * parents as f64).ceil();
        // usize::MAX as f64 rounds up to 2^64, itself out of range.
        if !count.is_finite() || count < 0.0 || count >= usize::MAX as f64 {
            return Err(SimulationError::InvalidParameter {
                name: "growth_rate",
                reason: "offspring count does not fit in usize",
            });
        }
        Ok(count as usize)
    }
}
