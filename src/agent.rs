use crate::gene::GeneTag;
use crate::AgentHash;
use crate::AgentId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub(crate) fn from_coin(heads: bool) -> Self {
        if heads {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

/// The ancestors of one agent.
///
/// Holds the same ids twice: as an ascending sequence (for merge
/// and reverse scans) and as a set (for membership tests).
/// Both are filled together by [`crate::resolve_ancestors`].
#[derive(Debug, Clone, Default)]
pub struct AncestorData {
    ordered: Vec<AgentId>,
    members: AgentHash,
}

impl AncestorData {
    pub(crate) fn new(ordered: Vec<AgentId>, members: AgentHash) -> Self {
        debug_assert_eq!(ordered.len(), members.len());
        debug_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
        Self { ordered, members }
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.ordered.len(), self.members.len());
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.members.contains(&id)
    }

    /// Ancestor ids, ascending.
    pub fn as_slice(&self) -> &[AgentId] {
        &self.ordered
    }

    pub fn members(&self) -> &AgentHash {
        &self.members
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    generation: usize,
    sex: Sex,
    // NOTE: founders point both links at AgentId(0).
    // Never follow them when generation == 0.
    mother: AgentId,
    father: AgentId,
    children: Vec<AgentId>,
    ancestors: AncestorData,
    genes: Vec<GeneTag>,
}

impl Agent {
    pub fn founder(id: AgentId, sex: Sex) -> Self {
        Self {
            id,
            generation: 0,
            sex,
            mother: AgentId(0),
            father: AgentId(0),
            children: vec![],
            ancestors: AncestorData::default(),
            genes: vec![],
        }
    }

    pub fn child(id: AgentId, generation: usize, sex: Sex, mother: AgentId, father: AgentId) -> Self {
        Self {
            id,
            generation,
            sex,
            mother,
            father,
            children: vec![],
            ancestors: AncestorData::default(),
            genes: vec![],
        }
    }

    pub fn with_genes(self, genes: Vec<GeneTag>) -> Self {
        Self { genes, ..self }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_founder(&self) -> bool {
        self.generation == 0
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn mother(&self) -> AgentId {
        self.mother
    }

    pub fn father(&self) -> AgentId {
        self.father
    }

    pub fn parents(&self) -> [AgentId; 2] {
        [self.mother, self.father]
    }

    pub fn children(&self) -> &[AgentId] {
        &self.children
    }

    pub fn ancestors(&self) -> &AncestorData {
        &self.ancestors
    }

    pub fn genes(&self) -> &[GeneTag] {
        &self.genes
    }

    pub(crate) fn add_child(&mut self, child: AgentId) {
        self.children.push(child);
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }

    pub(crate) fn set_ancestors(&mut self, ancestors: AncestorData) {
        self.ancestors = ancestors;
    }
}

/// Share a mother or a father.
/// Founders are never siblings.
pub fn is_sibling(a: &Agent, b: &Agent) -> bool {
    if a.is_founder() || b.is_founder() {
        return false;
    }
    a.mother == b.mother || a.father == b.father
}
