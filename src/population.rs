use std::ops::Range;

use rand::Rng;

use crate::Agent;
use crate::AgentId;
use crate::GeneTag;
use crate::Sex;
use crate::SimulationError;

/// Append-only store of every agent ever born.
///
/// An agent's id is its index. Parents are always pushed before
/// their children, so ids never decrease with generation.
#[derive(Debug, Default, Clone)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            agents: Vec::with_capacity(capacity),
        }
    }

    /// Build a store from prepared records.
    ///
    /// Each record's id must equal its position and every
    /// non-founder must point at parents of strictly lower
    /// generation that appear earlier in `agents`.
    /// Generations must be stored in order without gaps: each
    /// record is in the generation of the one before it or the next.
    /// Children lists are rebuilt from the parent links.
    pub fn from_agents(mut agents: Vec<Agent>) -> Result<Self, SimulationError> {
        for (index, agent) in agents.iter().enumerate() {
            if agent.id().as_index() != index {
                return Err(SimulationError::InvalidPedigree {
                    agent: agent.id(),
                    reason: "id does not match position",
                });
            }
            if let Some(previous) = index.checked_sub(1).map(|i| agents[i].generation()) {
                if agent.generation() < previous {
                    return Err(SimulationError::InvalidPedigree {
                        agent: agent.id(),
                        reason: "generation is lower than the previous record's",
                    });
                }
                if agent.generation() > previous + 1 {
                    return Err(SimulationError::InvalidPedigree {
                        agent: agent.id(),
                        reason: "generation skips ahead of the previous record's",
                    });
                }
            }
            if agent.is_founder() {
                continue;
            }
            for parent in agent.parents() {
                if parent.as_index() >= index {
                    return Err(SimulationError::InvalidPedigree {
                        agent: agent.id(),
                        reason: "parent is not stored before child",
                    });
                }
                if agents[parent.as_index()].generation() >= agent.generation() {
                    return Err(SimulationError::InvalidPedigree {
                        agent: agent.id(),
                        reason: "parent generation is not lower than child generation",
                    });
                }
            }
        }
        agents.iter_mut().for_each(Agent::clear_children);
        for index in 0..agents.len() {
            if agents[index].is_founder() {
                continue;
            }
            let child = agents[index].id();
            for parent in agents[index].parents() {
                agents[parent.as_index()].add_child(child);
            }
        }
        Ok(Self { agents })
    }

    fn next_id(&self) -> AgentId {
        AgentId(self.agents.len())
    }

    pub fn push_founder<R: Rng>(&mut self, num_genes: usize, rng: &mut R) -> AgentId {
        let id = self.next_id();
        let sex = Sex::from_coin(rng.gen_bool(0.5));
        let genes = (0..num_genes).map(|locus| GeneTag::new(id, locus)).collect();
        self.agents.push(Agent::founder(id, sex).with_genes(genes));
        id
    }

    /// Append a child of `father` and `mother`.
    ///
    /// Every locus is copied from one parent chosen by a fair coin,
    /// then mutated with probability `mutation_rate`.
    pub fn add_child<R: Rng>(
        &mut self,
        father: AgentId,
        mother: AgentId,
        mutation_rate: f64,
        rng: &mut R,
    ) -> AgentId {
        let id = self.next_id();
        let generation = self.agents[father.as_index()]
            .generation()
            .max(self.agents[mother.as_index()].generation())
            + 1;
        let sex = Sex::from_coin(rng.gen_bool(0.5));
        let paternal = self.agents[father.as_index()].genes();
        let maternal = self.agents[mother.as_index()].genes();
        debug_assert_eq!(paternal.len(), maternal.len());
        let genes = paternal
            .iter()
            .zip(maternal)
            .map(|(&p, &m)| {
                let gene = if rng.gen_bool(0.5) { p } else { m };
                if mutation_rate > 0.0 && rng.gen::<f64>() < mutation_rate {
                    gene.mutated()
                } else {
                    gene
                }
            })
            .collect();
        self.agents
            .push(Agent::child(id, generation, sex, mother, father).with_genes(genes));
        self.agents[father.as_index()].add_child(id);
        self.agents[mother.as_index()].add_child(id);
        id
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.as_index())
    }

    pub fn last(&self) -> Option<&Agent> {
        self.agents.last()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.as_index()]
    }
}

impl std::ops::Index<AgentId> for Population {
    type Output = Agent;

    fn index(&self, id: AgentId) -> &Self::Output {
        &self.agents[id.as_index()]
    }
}

/// Boundaries of each generation within a [`Population`].
///
/// `boundaries[g]` is one past the index of the last agent of
/// generation `g`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationIndex {
    boundaries: Vec<usize>,
}

impl GenerationIndex {
    /// Recompute the boundaries by scanning for generation changes.
    pub fn from_population(population: &Population) -> Self {
        let mut boundaries = vec![];
        let agents = population.agents();
        if let Some(first) = agents.first() {
            let mut generation = first.generation();
            for (i, agent) in agents.iter().enumerate() {
                if agent.generation() != generation {
                    generation = agent.generation();
                    boundaries.push(i);
                }
            }
            boundaries.push(agents.len());
        }
        Self { boundaries }
    }

    /// Close a generation of `count` agents.
    pub fn record_boundary(&mut self, count: usize) -> Result<usize, SimulationError> {
        if count == 0 {
            return Err(SimulationError::EmptyGeneration);
        }
        let boundary = self.boundaries.last().copied().unwrap_or(0) + count;
        self.boundaries.push(boundary);
        Ok(boundary)
    }

    pub fn generation_range(&self, generation: usize) -> Result<Range<usize>, SimulationError> {
        let end = *self
            .boundaries
            .get(generation)
            .ok_or(SimulationError::GenerationOutOfRange {
                generation,
                available: self.boundaries.len(),
            })?;
        let start = if generation == 0 {
            0
        } else {
            self.boundaries[generation - 1]
        };
        Ok(start..end)
    }

    pub fn num_generations(&self) -> usize {
        self.boundaries.len()
    }

    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }
}
