//! EL concepts

use crate::model::{Individual, OwlIri};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Structure of an EL concept.
///
/// The derived order is the canonical order in which concept sets are
/// iterated, which makes every tie-break reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConceptKind {
    /// owl:Thing (⊤)
    Thing,
    /// Named class
    Atomic(OwlIri),
    /// Existential restriction: ∃R.C
    Existential { role: OwlIri, filler: Concept },
    /// Intersection: C ⊓ D
    Intersection { left: Concept, right: Concept },
    /// owl:Nothing (⊥)
    Nothing,
}

impl ConceptKind {
    /// Syntactic length of the expression
    pub fn length(&self) -> usize {
        match self {
            ConceptKind::Thing | ConceptKind::Nothing | ConceptKind::Atomic(_) => 1,
            ConceptKind::Existential { filler, .. } => 2 + filler.length(),
            ConceptKind::Intersection { left, right } => 1 + left.length() + right.length(),
        }
    }
}

#[derive(Debug)]
struct ConceptNode {
    kind: ConceptKind,
    length: usize,
    instances: BTreeSet<Individual>,
}

/// Immutable, cheaply clonable concept with its instance set.
///
/// Equality, hashing and ordering only look at the structure; the instance
/// set is data derived by the knowledge base that built the concept.
#[derive(Clone)]
pub struct Concept(Arc<ConceptNode>);

impl Concept {
    /// Builds a concept node. Meant for knowledge-base implementations, which
    /// own the computation of `instances`.
    pub fn new(kind: ConceptKind, instances: BTreeSet<Individual>) -> Self {
        let length = kind.length();
        Self(Arc::new(ConceptNode { kind, length, instances }))
    }

    pub fn kind(&self) -> &ConceptKind {
        &self.0.kind
    }

    pub fn length(&self) -> usize {
        self.0.length
    }

    pub fn instances(&self) -> &BTreeSet<Individual> {
        &self.0.instances
    }

    pub fn is_thing(&self) -> bool {
        matches!(self.0.kind, ConceptKind::Thing)
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self.0.kind, ConceptKind::Atomic(_))
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.kind == other.0.kind
    }
}

impl Eq for Concept {}

impl Hash for Concept {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.kind.hash(state);
    }
}

impl PartialOrd for Concept {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Concept {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.kind.cmp(&other.0.kind)
    }
}

impl std::fmt::Debug for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Concept({}, length={}, instances={})", self, self.length(), self.instances().len())
    }
}

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            ConceptKind::Thing => write!(f, "⊤"),
            ConceptKind::Nothing => write!(f, "⊥"),
            ConceptKind::Atomic(iri) => write!(f, "{}", iri.local_name()),
            ConceptKind::Existential { role, filler } => write!(f, "∃{}.{}", role.local_name(), filler),
            ConceptKind::Intersection { left, right } => write!(f, "({} ⊓ {})", left, right),
        }
    }
}
