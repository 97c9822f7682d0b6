use thiserror::Error;

use crate::AgentId;
use crate::Sex;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("generation {generation} is out of range (have {available} generations)")]
    GenerationOutOfRange { generation: usize, available: usize },
    #[error("no agent with id {0:?}")]
    UnknownAgent(AgentId),
    #[error("cannot record a generation with zero members")]
    EmptyGeneration,
    #[error("invalid pedigree at agent {agent:?}: {reason}")]
    InvalidPedigree { agent: AgentId, reason: &'static str },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    #[error("unknown analysis flag `{0}` (expected one of N, C, D, G)")]
    UnknownAnalysisFlag(char),
    #[error("no mating pairs for generation {generation}")]
    NoMatingPairs { generation: usize },
    #[error("no {sex:?} agents in generation {generation}")]
    EmptySexPool { generation: usize, sex: Sex },
    #[error("malformed gene tag `{0}`")]
    MalformedGeneTag(String),
}
