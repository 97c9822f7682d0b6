use rand::seq::SliceRandom;
use rand::Rng;

use crate::is_sibling;
use crate::Agent;
use crate::AgentId;
use crate::Population;
use crate::Sex;
use crate::SimulationError;

/// One member of the current mating pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    pub id: AgentId,
    pub mated: bool,
}

impl PoolEntry {
    pub fn new(id: AgentId) -> Self {
        Self { id, mated: false }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MatingPair {
    pub male: AgentId,
    pub female: AgentId,
}

impl MatingPair {
    // NOTE: with compatibility checks off, same-sex pairs
    // are possible. `a` then takes the male slot.
    fn new(a: &Agent, b: &Agent) -> Self {
        if a.sex() == Sex::Male || b.sex() != Sex::Male {
            Self {
                male: a.id(),
                female: b.id(),
            }
        } else {
            Self {
                male: b.id(),
                female: a.id(),
            }
        }
    }
}

/// Any of the four parents of `a` and `b` are siblings.
pub fn is_cousin(population: &Population, a: &Agent, b: &Agent) -> bool {
    if a.generation() < 2 || b.generation() < 2 {
        return false;
    }
    a.parents().iter().any(|&pa| {
        b.parents()
            .iter()
            .any(|&pb| is_sibling(&population[pa], &population[pb]))
    })
}

pub fn is_compatible(population: &Population, a: &Agent, b: &Agent) -> bool {
    a.sex() != b.sex() && !is_sibling(a, b) && !is_cousin(population, a, b)
}

/// Greedily pair the members of `pool`, in order.
///
/// Each agent still unmated looks at no more than the next `mating_k`
/// entries and takes the first unmated one it may mate with.
/// Agents left without a partner are not reproducing this generation.
pub fn pair_agents(
    pool: &mut [PoolEntry],
    population: &Population,
    mating_k: usize,
    compatible: bool,
) -> Vec<MatingPair> {
    let mut pairs = vec![];
    for i in 0..pool.len() {
        if pool[i].mated {
            continue;
        }
        let a = &population[pool[i].id];
        let hi = pool.len().min(i.saturating_add(mating_k).saturating_add(1));
        for j in (i + 1)..hi {
            if pool[j].mated {
                continue;
            }
            let b = &population[pool[j].id];
            if !compatible || is_compatible(population, a, b) {
                pairs.push(MatingPair::new(a, b));
                pool[i].mated = true;
                pool[j].mated = true;
                break;
            }
        }
    }
    pairs
}

/// Produce `offspring` children, drawing the parents of each one
/// uniformly (with replacement) from `pairs`.
///
/// `generation` is the generation of the parents.
pub(crate) fn reproduce_monogamous<R: Rng>(
    population: &mut Population,
    pairs: &[MatingPair],
    offspring: usize,
    mutation_rate: f64,
    generation: usize,
    rng: &mut R,
) -> Result<usize, SimulationError> {
    if pairs.is_empty() {
        return Err(SimulationError::NoMatingPairs { generation });
    }
    for _ in 0..offspring {
        if let Some(pair) = pairs.choose(rng) {
            population.add_child(pair.male, pair.female, mutation_rate, rng);
        }
    }
    Ok(offspring)
}

/// Produce `offspring` children, each from a male and a female drawn
/// independently and uniformly (with replacement) from `pool`.
///
/// `generation` is the generation of the parents.
pub(crate) fn reproduce_non_monogamous<R: Rng>(
    population: &mut Population,
    pool: &[PoolEntry],
    offspring: usize,
    mutation_rate: f64,
    generation: usize,
    rng: &mut R,
) -> Result<usize, SimulationError> {
    let (males, females): (Vec<AgentId>, Vec<AgentId>) = pool
        .iter()
        .map(|entry| entry.id)
        .partition(|&id| population[id].sex() == Sex::Male);
    if males.is_empty() {
        return Err(SimulationError::EmptySexPool {
            generation,
            sex: Sex::Male,
        });
    }
    if females.is_empty() {
        return Err(SimulationError::EmptySexPool {
            generation,
            sex: Sex::Female,
        });
    }
    for _ in 0..offspring {
        let father = males[rng.gen_range(0..males.len())];
        let mother = females[rng.gen_range(0..females.len())];
        population.add_child(father, mother, mutation_rate, rng);
    }
    Ok(offspring)
}


#[cfg(test)]
mod test_compatibility {
    use super::*;
    use crate::fixtures::*;
    use super::mating_fixtures::*;

    #[test]
    fn siblings_and_cousins_in_pedigree() {
        let population = four_generation_pedigree();
        let p = |i: usize| &population[AgentId(i)];
        // full siblings
        assert!(!is_compatible(&population, p(9), p(10)));
        // cousins through siblings 5, 6, 7, 8
        assert!(is_cousin(&population, p(9), p(11)));
        assert!(!is_compatible(&population, p(9), p(11)));
        // same sex
        assert!(!is_compatible(&population, p(11), p(12)));
        // founders of opposite sex
        assert!(is_compatible(&population, p(0), p(1)));
    }

    #[test]
    fn unrelated_and_related_families() {
        let population = two_families();
        let p = |i: usize| &population[AgentId(i)];
        assert!(is_compatible(&population, p(8), p(9)));
        assert!(is_compatible(&population, p(13), p(14)));
        assert!(!is_cousin(&population, p(13), p(14)));
        // 8 and 12 are brothers, so 13 and 15 are cousins
        // (and half siblings through 9).
        assert!(is_cousin(&population, p(13), p(15)));
        assert!(!is_compatible(&population, p(13), p(15)));
    }

    #[test]
    fn generation_one_is_never_cousin() {
        let population = two_families();
        assert!(!is_cousin(
            &population,
            &population[AgentId(8)],
            &population[AgentId(12)]
        ));
    }
}

#[cfg(test)]
mod test_pair_agents {
    use super::*;
    use super::mating_fixtures::*;
    use rand::SeedableRng;

    #[test]
    fn everyone_paired_without_compatibility() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1234);
        let mut population = Population::default();
        for _ in 0..20 {
            population.push_founder(0, &mut rng);
        }
        let mut pool = (0..20).map(|i| PoolEntry::new(AgentId(i))).collect::<Vec<_>>();
        pool.shuffle(&mut rng);
        let pairs = pair_agents(&mut pool, &population, 50, false);
        assert_eq!(pairs.len(), 10);
        assert!(pool.iter().all(|e| e.mated));
        let mut seen = pairs
            .iter()
            .flat_map(|p| [p.male, p.female])
            .collect::<Vec<_>>();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn window_limits_search() {
        let population = two_families();
        // 8 M, 10 M, 9 F: with a window of 1, 8 only sees 10.
        let mut pool = pool_of(&[8, 10, 9]);
        let pairs = pair_agents(&mut pool, &population, 1, true);
        assert_eq!(
            pairs,
            vec![MatingPair {
                male: AgentId(10),
                female: AgentId(9)
            }]
        );
        assert!(!pool[0].mated);

        let mut pool = pool_of(&[8, 10, 9]);
        let pairs = pair_agents(&mut pool, &population, 2, true);
        assert_eq!(
            pairs,
            vec![MatingPair {
                male: AgentId(8),
                female: AgentId(9)
            }]
        );
        assert!(!pool[1].mated);
    }

    #[test]
    fn female_first_goes_in_female_slot() {
        let population = two_families();
        let mut pool = pool_of(&[11, 10]);
        let pairs = pair_agents(&mut pool, &population, 50, true);
        assert_eq!(
            pairs,
            vec![MatingPair {
                male: AgentId(10),
                female: AgentId(11)
            }]
        );
    }

    #[test]
    fn incompatible_pool_has_no_pairs() {
        let population = two_families();
        // all males
        let mut pool = pool_of(&[8, 10, 12]);
        assert!(pair_agents(&mut pool, &population, 50, true).is_empty());
        assert!(pool.iter().all(|e| !e.mated));
        // same pool pairs once checks are off
        let pairs = pair_agents(&mut pool, &population, 50, false);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn pre_mated_entries_are_skipped() {
        let population = two_families();
        let mut pool = pool_of(&[8, 9, 10, 11]);
        pool[1].mated = true;
        let pairs = pair_agents(&mut pool, &population, 50, true);
        assert_eq!(
            pairs,
            vec![MatingPair {
                male: AgentId(8),
                female: AgentId(11)
            }]
        );
        assert!(!pool[2].mated);
    }
}

#[cfg(test)]
mod test_reproduction {
    use super::*;
    use super::mating_fixtures::*;
    use rand::SeedableRng;

    #[test]
    fn monogamous_children_come_from_pairs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(77);
        let mut population = two_families();
        let pairs = [
            MatingPair {
                male: AgentId(8),
                female: AgentId(9),
            },
            MatingPair {
                male: AgentId(10),
                female: AgentId(11),
            },
        ];
        let before = population.len();
        let n = reproduce_monogamous(&mut population, &pairs, 7, 0.0, 1, &mut rng).unwrap();
        assert_eq!(n, 7);
        assert_eq!(population.len(), before + 7);
        for agent in &population.agents()[before..] {
            assert_eq!(agent.generation(), 2);
            assert!(pairs.contains(&MatingPair {
                male: agent.father(),
                female: agent.mother()
            }));
        }
        let born = population[AgentId(8)].children().len() + population[AgentId(10)].children().len();
        // 13 and 14 were already children of 8 and 10
        assert_eq!(born, 9);
    }

    #[test]
    fn monogamous_without_pairs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(77);
        let mut population = two_families();
        let before = population.len();
        assert_eq!(
            reproduce_monogamous(&mut population, &[], 5, 0.0, 1, &mut rng),
            Err(SimulationError::NoMatingPairs { generation: 1 })
        );
        assert_eq!(population.len(), before);
    }

    #[test]
    fn non_monogamous_draws_by_sex() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut population = two_families();
        let pool = pool_of(&[8, 9, 10, 11, 12]);
        let before = population.len();
        let n =
            reproduce_non_monogamous(&mut population, &pool, 10, 0.0, 1, &mut rng).unwrap();
        assert_eq!(n, 10);
        for agent in &population.agents()[before..] {
            assert_eq!(agent.generation(), 2);
            assert_eq!(population[agent.father()].sex(), Sex::Male);
            assert_eq!(population[agent.mother()].sex(), Sex::Female);
        }
    }

    #[test]
    fn non_monogamous_empty_sex_pool() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut population = two_families();
        let males = pool_of(&[8, 10, 12]);
        assert_eq!(
            reproduce_non_monogamous(&mut population, &males, 4, 0.0, 1, &mut rng),
            Err(SimulationError::EmptySexPool {
                generation: 1,
                sex: Sex::Female
            })
        );
        let females = pool_of(&[9, 11]);
        assert_eq!(
            reproduce_non_monogamous(&mut population, &females, 4, 0.0, 1, &mut rng),
            Err(SimulationError::EmptySexPool {
                generation: 1,
                sex: Sex::Male
            })
        );
    }
}
