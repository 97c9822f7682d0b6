use std::fmt;
use std::str::FromStr;

use crate::AgentId;
use crate::SimulationError;

/// Marker appended to the text form once per mutation.
const MUTATION_MARKER: char = '`';

/// A gene at one locus.
///
/// Records the founder the gene descends from, the locus it was
/// created at and how many times it has mutated since.
/// The text form is `<origin>-<locus>` followed by one backtick
/// per mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneTag {
    origin: AgentId,
    locus: usize,
    mutations: u32,
}

impl GeneTag {
    pub fn new(origin: AgentId, locus: usize) -> Self {
        Self {
            origin,
            locus,
            mutations: 0,
        }
    }

    pub fn origin(&self) -> AgentId {
        self.origin
    }

    pub fn locus(&self) -> usize {
        self.locus
    }

    pub fn mutations(&self) -> u32 {
        self.mutations
    }

    #[must_use]
    pub fn mutated(self) -> Self {
        Self {
            mutations: self.mutations.saturating_add(1),
            ..self
        }
    }
}

impl fmt::Display for GeneTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin.as_index(), self.locus)?;
        for _ in 0..self.mutations {
            write!(f, "{MUTATION_MARKER}")?;
        }
        Ok(())
    }
}

impl FromStr for GeneTag {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SimulationError::MalformedGeneTag(s.to_owned());
        let body = s.trim_end_matches(MUTATION_MARKER);
        let mutations =
            u32::try_from(s.len() - body.len()).map_err(|_| malformed())?;
        let (origin, locus) = body.split_once('-').ok_or_else(malformed)?;
        let origin = origin.parse::<usize>().map_err(|_| malformed())?;
        let locus = locus.parse::<usize>().map_err(|_| malformed())?;
        Ok(Self {
            origin: AgentId(origin),
            locus,
            mutations,
        })
    }
}
