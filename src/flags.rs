// This module encapsulates the bitflags API
// so that we don't leak details that may
// affect semver later on.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::SimulationError;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    struct AnalysisBitFlags: u32 {
        const EMPTY = 0;
        const ANCESTOR_COUNT = 1 << 1;
        const COMMON_ANCESTORS = 1 << 2;
        const GENERATION_DISTANCE = 1 << 3;
        const GENE_DISTRIBUTION = 1 << 4;
    }
}

// Letter used on the command line for each statistic.
const LETTERS: [(char, AnalysisBitFlags); 4] = [
    ('N', AnalysisBitFlags::ANCESTOR_COUNT),
    ('C', AnalysisBitFlags::COMMON_ANCESTORS),
    ('D', AnalysisBitFlags::GENERATION_DISTANCE),
    ('G', AnalysisBitFlags::GENE_DISTRIBUTION),
];

/// Which statistics [`crate::analyze`] computes.
///
/// Parses from any combination of the letters
/// `N` (ancestor counts), `C` (common ancestors),
/// `D` (generation distance) and `G` (gene distribution).
#[repr(transparent)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AnalysisFlags(AnalysisBitFlags);

impl AnalysisFlags {
    pub fn all() -> Self {
        Self::default()
            .with_ancestor_count()
            .with_common_ancestors()
            .with_generation_distance()
            .with_gene_distribution()
    }

    pub fn with_ancestor_count(self) -> Self {
        Self(self.0 | AnalysisBitFlags::ANCESTOR_COUNT)
    }

    pub fn with_common_ancestors(self) -> Self {
        Self(self.0 | AnalysisBitFlags::COMMON_ANCESTORS)
    }

    pub fn with_generation_distance(self) -> Self {
        Self(self.0 | AnalysisBitFlags::GENERATION_DISTANCE)
    }

    pub fn with_gene_distribution(self) -> Self {
        Self(self.0 | AnalysisBitFlags::GENE_DISTRIBUTION)
    }

    pub fn ancestor_count(&self) -> bool {
        self.0.contains(AnalysisBitFlags::ANCESTOR_COUNT)
    }

    pub fn common_ancestors(&self) -> bool {
        self.0.contains(AnalysisBitFlags::COMMON_ANCESTORS)
    }

    pub fn generation_distance(&self) -> bool {
        self.0.contains(AnalysisBitFlags::GENERATION_DISTANCE)
    }

    pub fn gene_distribution(&self) -> bool {
        self.0.contains(AnalysisBitFlags::GENE_DISTRIBUTION)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for AnalysisFlags {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = AnalysisBitFlags::EMPTY;
        for c in s.chars() {
            let (_, flag) = LETTERS
                .iter()
                .find(|(letter, _)| *letter == c)
                .ok_or(SimulationError::UnknownAnalysisFlag(c))?;
            flags |= *flag;
        }
        Ok(Self(flags))
    }
}

impl fmt::Display for AnalysisFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, flag) in LETTERS {
            if self.0.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_analysis_flags {
    use super::*;

    #[test]
    fn parse_letters() {
        let flags: AnalysisFlags = "ND".parse().unwrap();
        assert!(flags.ancestor_count());
        assert!(!flags.common_ancestors());
        assert!(flags.generation_distance());
        assert!(!flags.gene_distribution());
    }

    #[test]
    fn parse_all_in_any_order() {
        let flags: AnalysisFlags = "GDCN".parse().unwrap();
        assert_eq!(flags, AnalysisFlags::all());
        assert_eq!(flags.to_string(), "NCDG");
    }

    #[test]
    fn repeated_letters() {
        let flags: AnalysisFlags = "CCC".parse().unwrap();
        assert_eq!(flags, AnalysisFlags::default().with_common_ancestors());
    }

    #[test]
    fn empty_selects_nothing() {
        let flags: AnalysisFlags = "".parse().unwrap();
        assert!(flags.is_empty());
        assert_eq!(flags.to_string(), "");
    }

    #[test]
    fn unknown_letter() {
        assert_eq!(
            "NX".parse::<AnalysisFlags>(),
            Err(SimulationError::UnknownAnalysisFlag('X'))
        );
    }
}
