use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use crate::count_common;
use crate::generation_distance;
use crate::AgentId;
use crate::GeneTag;
use crate::Parameters;
use crate::Population;
use crate::Simulation;
use crate::SimulationError;

/// Ancestor counts over the last generation.
#[derive(Debug, Clone, PartialEq)]
pub struct AncestorCountStats {
    pub population: usize,
    pub last_generation_size: usize,
    pub generation: usize,
    /// `2^(generation + 1) - 2`, the size of a complete pedigree.
    pub max_possible: f64,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// Summary of a value computed for every unordered pair in the last
/// generation.
///
/// NOTE: `mean` divides by `population^2 / 2`, not by `pairs`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseStats {
    pub pairs: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// Spread of genes within one generation.
///
/// Ties for "most common" go to the lowest tag or id.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneDistribution {
    pub generation: usize,
    pub distinct_genes: usize,
    pub most_common_gene: Option<(GeneTag, usize)>,
    pub contributing_founders: usize,
    pub most_common_founder: Option<(AgentId, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub generation: usize,
    pub ancestor_counts: Option<AncestorCountStats>,
    pub common_ancestors: Option<PairwiseStats>,
    pub generation_distance: Option<PairwiseStats>,
    pub gene_distribution: Option<Vec<GeneDistribution>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportBody {
    NoAgents,
    FoundersOnly,
    Statistics(Statistics),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub simulation_id: usize,
    pub parameters: Parameters,
    pub population: usize,
    pub body: ReportBody,
}

/// Resolve the ancestors of the last generation and compute the
/// statistics selected by the simulation's analysis flags.
pub fn analyze(simulation: &mut Simulation) -> Result<AnalysisReport, SimulationError> {
    let flags = simulation.parameters().analysis;
    let mut report = AnalysisReport {
        simulation_id: simulation.id(),
        parameters: simulation.parameters().clone(),
        population: simulation.population().len(),
        body: ReportBody::NoAgents,
    };
    let generation = match simulation.population().last() {
        None => {
            tracing::info!(simulation = simulation.id(), "no agents to analyze");
            return Ok(report);
        }
        Some(agent) if agent.is_founder() => {
            tracing::info!(simulation = simulation.id(), "only founders, no ancestry to analyze");
            report.body = ReportBody::FoundersOnly;
            return Ok(report);
        }
        Some(agent) => agent.generation(),
    };

    simulation.resolve_generation(generation)?;
    let range = simulation.generations().generation_range(generation)?;
    let population = simulation.population();
    let mut statistics = Statistics {
        generation,
        ancestor_counts: None,
        common_ancestors: None,
        generation_distance: None,
        gene_distribution: None,
    };
    if flags.ancestor_count() {
        statistics.ancestor_counts = Some(ancestor_counts(population, range.clone()));
    }
    if flags.common_ancestors() {
        statistics.common_ancestors = Some(pairwise(range.clone(), |a, b| {
            Ok(count_common(
                population[a].ancestors().as_slice(),
                population[b].ancestors().as_slice(),
            ))
        })?);
    }
    if flags.generation_distance() {
        statistics.generation_distance = Some(pairwise(range.clone(), |a, b| {
            generation_distance(population, a, b)
        })?);
    }
    if flags.gene_distribution() {
        let generations = simulation.generations();
        let mut distributions = Vec::with_capacity(generations.num_generations());
        for g in 0..generations.num_generations() {
            distributions.push(gene_distribution(population, g, generations.generation_range(g)?));
        }
        statistics.gene_distribution = Some(distributions);
    }
    tracing::debug!(simulation = simulation.id(), ?statistics, "analysis complete");
    report.body = ReportBody::Statistics(statistics);
    Ok(report)
}

fn ancestor_counts(population: &Population, range: Range<usize>) -> AncestorCountStats {
    let generation = population[AgentId(range.start)].generation();
    let counts = range
        .map(|i| population[AgentId(i)].ancestors().len())
        .collect::<Vec<_>>();
    let total = counts.iter().sum::<usize>();
    AncestorCountStats {
        population: population.len(),
        last_generation_size: counts.len(),
        generation,
        max_possible: 2f64.powi(generation as i32 + 1) - 2.0,
        min: counts.iter().copied().min().unwrap_or(0),
        max: counts.iter().copied().max().unwrap_or(0),
        mean: (total as f64 / counts.len() as f64).round(),
    }
}

fn pairwise<F>(range: Range<usize>, mut f: F) -> Result<PairwiseStats, SimulationError>
where
    F: FnMut(AgentId, AgentId) -> Result<usize, SimulationError>,
{
    let mut pairs = 0;
    let mut total = 0;
    let mut min = usize::MAX;
    let mut max = 0;
    for i in range.clone() {
        for j in (i + 1)..range.end {
            let value = f(AgentId(i), AgentId(j))?;
            min = min.min(value);
            max = max.max(value);
            total += value;
            pairs += 1;
        }
    }
    let size = range.len() as f64;
    Ok(PairwiseStats {
        pairs,
        min: if pairs == 0 { 0 } else { min },
        max,
        mean: (total as f64 / (size * size / 2.0)).round(),
    })
}

// Ascending iteration plus a strict comparison keeps the first,
// i.e. lowest, key among equal counts.
fn most_common<K: Copy>(table: &BTreeMap<K, usize>) -> Option<(K, usize)> {
    let mut best: Option<(K, usize)> = None;
    for (&key, &count) in table {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best
}

fn gene_distribution(
    population: &Population,
    generation: usize,
    range: Range<usize>,
) -> GeneDistribution {
    let mut genes = BTreeMap::<GeneTag, usize>::new();
    let mut founders = BTreeMap::<AgentId, usize>::new();
    for i in range {
        for &gene in population[AgentId(i)].genes() {
            *genes.entry(gene).or_default() += 1;
            *founders.entry(gene.origin()).or_default() += 1;
        }
    }
    GeneDistribution {
        generation,
        distinct_genes: genes.len(),
        most_common_gene: most_common(&genes),
        contributing_founders: founders.len(),
        most_common_founder: most_common(&founders),
    }
}

impl fmt::Display for PairwiseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pairs == 0 {
            write!(f, "no pairs")
        } else {
            write!(f, "{} {} {}", self.min, self.max, self.mean)
        }
    }
}

impl fmt::Display for GeneDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Number of different genes in generation {}: {}",
            self.generation, self.distinct_genes
        )?;
        match self.most_common_gene {
            Some((gene, count)) => writeln!(f, "Most common gene: {gene}: {count}")?,
            None => writeln!(f, "Most common gene: none")?,
        }
        writeln!(
            f,
            "Number original individuals contributing to gene pool {}",
            self.contributing_founders
        )?;
        match self.most_common_founder {
            Some((id, count)) => writeln!(f, "Most common individual {} {count}", id.as_index()),
            None => writeln!(f, "Most common individual none"),
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "For simulation {}:", self.simulation_id)?;
        writeln!(f, "Parameters: {:?}", self.parameters)?;
        let statistics = match &self.body {
            ReportBody::NoAgents => return writeln!(f, "No agents in simulation"),
            ReportBody::FoundersOnly => {
                return writeln!(f, "Only founder generation exists, no ancestry to analyze")
            }
            ReportBody::Statistics(statistics) => statistics,
        };
        if let Some(counts) = &statistics.ancestor_counts {
            writeln!(f, "Number agents {}", counts.population)?;
            writeln!(
                f,
                "Number agents in last generation {}",
                counts.last_generation_size
            )?;
            writeln!(
                f,
                "Generations: {} Max possible ancestors {}",
                counts.generation, counts.max_possible
            )?;
            writeln!(
                f,
                "Min, max, mean number of ancestors for agents in last generation: {} {} {}",
                counts.min, counts.max, counts.mean
            )?;
        }
        if let Some(common) = &statistics.common_ancestors {
            writeln!(
                f,
                "Min, max, mean number of common ancestors (for last generation): {common}"
            )?;
        }
        if let Some(distance) = &statistics.generation_distance {
            writeln!(
                f,
                "Min, max, mean generation difference (for last generation): {distance}"
            )?;
        }
        if let Some(distributions) = &statistics.gene_distribution {
            for distribution in distributions {
                write!(f, "{distribution}")?;
            }
        }
        Ok(())
    }
}
