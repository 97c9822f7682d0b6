use ancestry_abm::{analyze, AnalysisFlags, Parameters, Simulation, SimulationError};
use clap::{ArgAction, Parser};

/// Simulate a growing population and report on its ancestry.
#[derive(Parser, Debug)]
#[command(name = "runsim", about, long_about = None)]
struct Args {
    /// Id of simulation
    #[arg(long, default_value_t = 0)]
    id: usize,

    /// Number of agents
    #[arg(long, default_value_t = 100)]
    agents: usize,

    /// Number of generations to run for
    #[arg(long, default_value_t = 4)]
    generations: usize,

    /// Growth rate of population
    #[arg(long, default_value_t = 1.01)]
    growth: f64,

    /// Agents are monogamous
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    monog: bool,

    /// Number of agents to search for a compatible match
    #[arg(long, default_value_t = 50)]
    matingk: usize,

    /// Choose compatible agents when mating
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    compatible: bool,

    /// Number of genes per agent in the founder generation
    #[arg(long, default_value_t = 10)]
    genes: usize,

    /// Gene mutation rate
    #[arg(long, default_value_t = 0.0)]
    mutation: f64,

    /// N: number of ancestors, C: common ancestors,
    /// D: generation differences, G: gene analysis
    #[arg(long, default_value_t = AnalysisFlags::all())]
    analysis: AnalysisFlags,

    /// Random seed; drawn from the operating system when absent
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Args> for Parameters {
    fn from(args: Args) -> Self {
        Self {
            simulation_id: args.id,
            num_agents: args.agents,
            generations: args.generations,
            growth_rate: args.growth,
            monogamous: args.monog,
            mating_k: args.matingk,
            num_genes: args.genes,
            mutation_rate: args.mutation,
            compatible: args.compatible,
            analysis: args.analysis,
            seed: args.seed,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), SimulationError> {
    init_tracing();
    let params = Parameters::from(Args::parse());
    let mut simulation = Simulation::new(params)?;
    let termination = simulation.simulate()?;
    tracing::info!(?termination, "simulation finished");
    let report = analyze(&mut simulation)?;
    print!("{report}");
    Ok(())
}
