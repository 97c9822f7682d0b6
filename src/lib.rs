//! Agent based model of a population reproducing over discrete
//! generations, used to study ancestry and inheritance.
//!
//! A [`Simulation`] grows a [`Population`] generation by generation.
//! [`analyze`] then resolves the ancestors of the last generation
//! and summarises ancestry depth, shared ancestry, the distance to the
//! most recent common ancestor and the spread of founder genes.

use nohash::BuildNoHashHasher;
use std::collections::HashSet;

mod agent;
mod analysis;
mod ancestry;
mod error;
mod flags;
mod gene;
mod mating;
mod parameters;
mod population;
mod simulation;

pub use agent::is_sibling;
pub use agent::Agent;
pub use agent::AncestorData;
pub use agent::Sex;
pub use analysis::analyze;
pub use analysis::AncestorCountStats;
pub use analysis::AnalysisReport;
pub use analysis::GeneDistribution;
pub use analysis::PairwiseStats;
pub use analysis::ReportBody;
pub use analysis::Statistics;
pub use ancestry::count_common;
pub use ancestry::generation_distance;
pub use ancestry::resolve_ancestors;
pub use error::SimulationError;
pub use flags::AnalysisFlags;
pub use gene::GeneTag;
pub use mating::is_compatible;
pub use mating::is_cousin;
pub use mating::pair_agents;
pub use mating::MatingPair;
pub use mating::PoolEntry;
pub use parameters::Parameters;
pub use population::GenerationIndex;
pub use population::Population;
pub use simulation::Simulation;
pub use simulation::SimulationState;
pub use simulation::Termination;

/// Identity of an agent: its index in the [`Population`].
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct AgentId(pub usize);

impl AgentId {
    pub fn as_index(&self) -> usize {
        self.0
    }
}

pub type AgentHash = HashSet<AgentId, BuildNoHashHasher<usize>>;

#[cfg(test)]
mod fixtures {
    use super::*;

    // Four generations, 14 agents.
    //
    //  gen 0:  0 (F)   1 (M)
    //  gen 1:  2 3 4          all children of 0 x 1
    //  gen 2:  5 6 7 8        all children of 3 x 4
    //  gen 3:  9 10           children of 5 x 7
    //          11 12 13       children of 8 x 6
    pub fn four_generation_agents() -> Vec<Agent> {
        use Sex::*;
        let id = AgentId;
        vec![
            Agent::founder(id(0), Female),
            Agent::founder(id(1), Male),
            Agent::child(id(2), 1, Female, id(0), id(1)),
            Agent::child(id(3), 1, Female, id(0), id(1)),
            Agent::child(id(4), 1, Male, id(0), id(1)),
            Agent::child(id(5), 2, Female, id(3), id(4)),
            Agent::child(id(6), 2, Male, id(3), id(4)),
            Agent::child(id(7), 2, Male, id(3), id(4)),
            Agent::child(id(8), 2, Female, id(3), id(4)),
            Agent::child(id(9), 3, Male, id(5), id(7)),
            Agent::child(id(10), 3, Female, id(5), id(7)),
            Agent::child(id(11), 3, Female, id(8), id(6)),
            Agent::child(id(12), 3, Female, id(8), id(6)),
            Agent::child(id(13), 3, Male, id(8), id(6)),
        ]
    }

    pub fn four_generation_pedigree() -> Population {
        Population::from_agents(four_generation_agents()).unwrap()
    }

    pub fn ids(raw: &[usize]) -> Vec<AgentId> {
        raw.iter().copied().map(AgentId).collect()
    }
}
