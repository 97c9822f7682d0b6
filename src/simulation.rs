use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::mating::reproduce_monogamous;
use crate::mating::reproduce_non_monogamous;
use crate::pair_agents;
use crate::resolve_ancestors;
use crate::AgentId;
use crate::GenerationIndex;
use crate::MatingPair;
use crate::Parameters;
use crate::PoolEntry;
use crate::Population;
use crate::Sex;
use crate::SimulationError;

/// Why a simulation stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every requested generation was attempted.
    GenerationBudgetExhausted,
    NoSurvivors { generation: usize },
    SingleSurvivor { generation: usize },
    NoMatingPairs { generation: usize },
    EmptySexPool { generation: usize, sex: Sex },
    NoChildren { generation: usize },
}

impl Termination {
    pub fn is_dead_end(&self) -> bool {
        !matches!(self, Termination::GenerationBudgetExhausted)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimulationState {
    Initialized,
    /// `generation` is the newest cohort, the next to reproduce.
    Advancing { generation: usize },
    Completed(Termination),
}

#[derive(Debug)]
pub struct Simulation {
    id: usize,
    population: Population,
    generations: GenerationIndex,
    // Members of the cohort that reproduces next.
    pool: Vec<PoolEntry>,
    pairs: Vec<MatingPair>,
    params: Parameters,
    rng: StdRng,
    state: SimulationState,
    current: usize,
    rounds: usize,
}

// Constructors
impl Simulation {
    /// Create the founder population.
    pub fn new(params: Parameters) -> Result<Self, SimulationError> {
        params.validate()?;
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut population = Population::with_capacity(params.num_agents);
        for _ in 0..params.num_agents {
            population.push_founder(params.num_genes, &mut rng);
        }
        let mut generations = GenerationIndex::default();
        if params.num_agents > 0 {
            generations.record_boundary(params.num_agents)?;
        }
        tracing::info!(
            simulation = params.simulation_id,
            founders = params.num_agents,
            generations = params.generations,
            monogamous = params.monogamous,
            "created simulation"
        );
        Self::assemble(params, population, generations, rng)
    }

    /// Continue from an existing population.
    ///
    /// The newest generation in `population` becomes the next
    /// to reproduce.
    pub fn from_population(
        params: Parameters,
        population: Population,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let generations = GenerationIndex::from_population(&population);
        Self::assemble(params, population, generations, rng)
    }

    fn assemble(
        params: Parameters,
        population: Population,
        generations: GenerationIndex,
        rng: StdRng,
    ) -> Result<Self, SimulationError> {
        let mut simulation = Self {
            id: params.simulation_id,
            population,
            generations,
            pool: vec![],
            pairs: vec![],
            params,
            rng,
            state: SimulationState::Initialized,
            current: 0,
            rounds: 0,
        };
        if simulation.generations.num_generations() > 0 {
            simulation.current = simulation.generations.num_generations() - 1;
            simulation.select_generation(simulation.current)?;
        }
        Ok(simulation)
    }
}

// Driver
impl Simulation {
    /// Fill the mating pool with the members of `generation`.
    pub fn select_generation(&mut self, generation: usize) -> Result<(), SimulationError> {
        let range = self.generations.generation_range(generation)?;
        self.pool.clear();
        self.pool.extend(range.map(|i| PoolEntry::new(AgentId(i))));
        Ok(())
    }

    fn finish(&mut self, termination: Termination) -> SimulationState {
        match termination {
            Termination::GenerationBudgetExhausted => tracing::info!(
                simulation = self.id,
                population = self.population.len(),
                generations = self.generations.num_generations(),
                "simulation completed"
            ),
            dead_end => tracing::warn!(
                simulation = self.id,
                population = self.population.len(),
                ?dead_end,
                "simulation stopped early"
            ),
        }
        self.state = SimulationState::Completed(termination);
        self.state
    }

    /// Attempt one round of reproduction.
    ///
    /// Dead ends complete the simulation and are reported through
    /// the returned state. Errors are reserved for broken invariants.
    pub fn step(&mut self) -> Result<SimulationState, SimulationError> {
        if let SimulationState::Completed(_) = self.state {
            return Ok(self.state);
        }
        let generation = self.current;
        if self.rounds >= self.params.generations {
            return Ok(self.finish(Termination::GenerationBudgetExhausted));
        }
        match self.pool.len() {
            0 => return Ok(self.finish(Termination::NoSurvivors { generation })),
            1 => return Ok(self.finish(Termination::SingleSurvivor { generation })),
            _ => (),
        }

        self.pool.shuffle(&mut self.rng);
        let offspring = self.params.offspring_count(self.pool.len())?;
        let born = if self.params.monogamous {
            self.pairs = pair_agents(
                &mut self.pool,
                &self.population,
                self.params.mating_k,
                self.params.compatible,
            );
            tracing::debug!(
                simulation = self.id,
                generation,
                cohort = self.pool.len(),
                pairs = self.pairs.len(),
                "paired agents"
            );
            reproduce_monogamous(
                &mut self.population,
                &self.pairs,
                offspring,
                self.params.mutation_rate,
                generation,
                &mut self.rng,
            )
        } else {
            reproduce_non_monogamous(
                &mut self.population,
                &self.pool,
                offspring,
                self.params.mutation_rate,
                generation,
                &mut self.rng,
            )
        };

        let born = match born {
            Ok(0) => return Ok(self.finish(Termination::NoChildren { generation })),
            Ok(born) => born,
            Err(SimulationError::NoMatingPairs { generation }) => {
                return Ok(self.finish(Termination::NoMatingPairs { generation }))
            }
            Err(SimulationError::EmptySexPool { generation, sex }) => {
                return Ok(self.finish(Termination::EmptySexPool { generation, sex }))
            }
            Err(e) => return Err(e),
        };
        self.generations.record_boundary(born)?;
        self.rounds += 1;
        self.current += 1;
        self.select_generation(self.current)?;
        tracing::debug!(
            simulation = self.id,
            generation = self.current,
            born,
            population = self.population.len(),
            "advanced generation"
        );
        self.state = SimulationState::Advancing {
            generation: self.current,
        };
        Ok(self.state)
    }

    /// Run until the generation budget is spent or a dead end is hit.
    pub fn simulate(&mut self) -> Result<Termination, SimulationError> {
        loop {
            if let SimulationState::Completed(termination) = self.step()? {
                return Ok(termination);
            }
        }
    }

    /// Resolve the ancestors of every member of `generation`.
    pub fn resolve_generation(&mut self, generation: usize) -> Result<(), SimulationError> {
        let range = self.generations.generation_range(generation)?;
        for i in range {
            resolve_ancestors(&mut self.population, AgentId(i))?;
        }
        Ok(())
    }
}

// Accessors
impl Simulation {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generations(&self) -> &GenerationIndex {
        &self.generations
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// The cohort that reproduces next.
    pub fn current_generation(&self) -> usize {
        self.current
    }

    pub fn pool(&self) -> &[PoolEntry] {
        &self.pool
    }

    /// Pairs formed during the last monogamous round.
    pub fn mating_pairs(&self) -> &[MatingPair] {
        &self.pairs
    }
}
