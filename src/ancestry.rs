use std::cmp::Ordering;

use nohash::BuildNoHashHasher;

use crate::AgentHash;
use crate::AgentId;
use crate::AncestorData;
use crate::Population;
use crate::SimulationError;

/// Compute and store the ancestors of `id`.
///
/// Walks parent links breadth first. The worklist is never popped:
/// a cursor moves along it while parents are appended, and the
/// visited ids left behind become the ancestor sequence.
/// Founders are roots and are not expanded.
///
/// Calling this again recomputes the same data.
pub fn resolve_ancestors(
    population: &mut Population,
    id: AgentId,
) -> Result<&AncestorData, SimulationError> {
    let agents = population.agents();
    let target = agents
        .get(id.as_index())
        .ok_or(SimulationError::UnknownAgent(id))?;
    let mut members = AgentHash::with_hasher(BuildNoHashHasher::default());
    let mut worklist = Vec::with_capacity(2 * target.generation() + 1);
    worklist.push(id);
    let mut cursor = 0;
    while cursor < worklist.len() {
        let current = &agents[worklist[cursor].as_index()];
        cursor += 1;
        if current.is_founder() {
            continue;
        }
        for parent in current.parents() {
            if members.insert(parent) {
                worklist.push(parent);
            }
        }
    }
    // The seed is always at the front.
    let _ = worklist.swap_remove(0);
    worklist.sort_unstable();
    tracing::trace!(agent = id.as_index(), ancestors = worklist.len(), "resolved ancestors");
    let agent = population.agent_mut(id);
    agent.set_ancestors(AncestorData::new(worklist, members));
    Ok(agent.ancestors())
}

/// Number of values present in both `a` and `b`.
///
/// Both inputs must be ascending and free of duplicates.
/// Runs a single merge sweep, so the cost is `O(a.len() + b.len())`.
pub fn count_common<T: Ord>(a: &[T], b: &[T]) -> usize {
    let mut i = 0;
    let mut j = 0;
    let mut total = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                total += 1;
                i += 1;
                j += 1;
            }
        }
    }
    total
}

/// Generations between the more recent of `a` and `b` and their most
/// recent common ancestor.
///
/// Both agents must have resolved ancestors.
///
/// Relies on ids being handed out in non-decreasing generation order:
/// scanning the ancestor sequence from its highest id therefore meets
/// the most recent common ancestor first. With no shared ancestor the
/// founders are taken as the meeting point and the result is the
/// generation of the more recent agent.
///
/// An agent is its own most recent common ancestor, so comparing an
/// agent with itself gives 0, and an agent compared with one of its
/// ancestors gives the generations between them.
///
/// Unknown ids give [`SimulationError::UnknownAgent`].
pub fn generation_distance(
    population: &Population,
    a: AgentId,
    b: AgentId,
) -> Result<usize, SimulationError> {
    let mut a = population.get(a).ok_or(SimulationError::UnknownAgent(a))?;
    let mut b = population.get(b).ok_or(SimulationError::UnknownAgent(b))?;
    if a.id() == b.id() {
        return Ok(0);
    }
    if a.generation() < b.generation() {
        std::mem::swap(&mut a, &mut b);
    }
    if a.ancestors().contains(b.id()) {
        return Ok(a.generation() - b.generation());
    }
    let found = a
        .ancestors()
        .as_slice()
        .iter()
        .rev()
        .find(|&&ancestor| b.ancestors().contains(ancestor))
        .map_or(0, |&ancestor| population[ancestor].generation());
    Ok(a.generation() - found)
}

#[cfg(test)]
mod test_resolve_ancestors {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn four_generation_pedigree_known_answers() {
        let mut population = four_generation_pedigree();
        let anc = resolve_ancestors(&mut population, AgentId(9)).unwrap();
        assert_eq!(anc.as_slice(), ids(&[0, 1, 3, 4, 5, 7]).as_slice());
        let mut from_set = anc.members().iter().copied().collect::<Vec<_>>();
        from_set.sort();
        assert_eq!(anc.as_slice(), from_set.as_slice());

        let last = AgentId(population.len() - 1);
        let anc = resolve_ancestors(&mut population, last).unwrap();
        assert_eq!(anc.as_slice(), ids(&[0, 1, 3, 4, 6, 8]).as_slice());
        let mut from_set = anc.members().iter().copied().collect::<Vec<_>>();
        from_set.sort();
        assert_eq!(anc.as_slice(), from_set.as_slice());
    }

    #[test]
    fn founders_have_no_ancestors() {
        let mut population = four_generation_pedigree();
        for i in [0, 1] {
            let anc = resolve_ancestors(&mut population, AgentId(i)).unwrap();
            assert!(anc.is_empty());
            assert!(anc.members().is_empty());
        }
    }

    #[test]
    fn only_the_queried_agent_is_updated() {
        let mut population = four_generation_pedigree();
        resolve_ancestors(&mut population, AgentId(9)).unwrap();
        for agent in population.agents() {
            if agent.id() != AgentId(9) {
                assert!(agent.ancestors().is_empty(), "{:?}", agent.id());
            }
        }
    }

    #[test]
    fn invariants_hold_for_every_agent() {
        let mut population = four_generation_pedigree();
        for i in 0..population.len() {
            resolve_ancestors(&mut population, AgentId(i)).unwrap();
        }
        for agent in population.agents() {
            let anc = agent.ancestors();
            assert_eq!(anc.as_slice().len(), anc.members().len());
            assert!(anc.as_slice().windows(2).all(|w| w[0] < w[1]));
            assert!(!anc.contains(agent.id()));
            for &x in anc.as_slice() {
                assert!(anc.contains(x));
                assert!(population[x].generation() < agent.generation());
            }
        }
        assert_eq!(
            population[AgentId(5)].ancestors().as_slice(),
            ids(&[0, 1, 3, 4]).as_slice()
        );
        assert_eq!(
            population[AgentId(2)].ancestors().as_slice(),
            ids(&[0, 1]).as_slice()
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut population = four_generation_pedigree();
        let first = resolve_ancestors(&mut population, AgentId(11))
            .unwrap()
            .as_slice()
            .to_vec();
        let second = resolve_ancestors(&mut population, AgentId(11)).unwrap();
        assert_eq!(first.as_slice(), second.as_slice());
        assert_eq!(second.members().len(), first.len());
    }

    #[test]
    fn unknown_agent() {
        let mut population = four_generation_pedigree();
        assert_eq!(
            resolve_ancestors(&mut population, AgentId(14)).unwrap_err(),
            SimulationError::UnknownAgent(AgentId(14))
        );
    }
}
