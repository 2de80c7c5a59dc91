//! EL refinement operator

use crate::LearnError;
use mimizuku_core::{Concept, ConceptKind, KnowledgeBase, OwlIri};
use std::collections::BTreeSet;

/// Maps a concept to its immediate specializations.
///
/// The operator has no depth limit; refinements of nested concepts grow
/// with the size of the operand refinements, so callers bound the
/// exploration themselves.
pub struct ElRefinementOperator<'kb, K: ?Sized> {
    kb: &'kb K,
}

impl<'kb, K: KnowledgeBase + ?Sized> ElRefinementOperator<'kb, K> {
    pub fn new(kb: &'kb K) -> Self {
        Self { kb }
    }

    pub fn refine(&self, concept: &Concept) -> Result<BTreeSet<Concept>, LearnError> {
        match concept.kind() {
            ConceptKind::Thing => self.refine_thing(),
            ConceptKind::Atomic(_) => self.refine_atomic(concept),
            ConceptKind::Existential { role, filler } => self.refine_existential_restriction(role, filler),
            ConceptKind::Intersection { left, right } => self.refine_intersection(left, right),
            ConceptKind::Nothing => Err(LearnError::UnsupportedConceptKind(concept.to_string())),
        }
    }

    /// ⊤ ↦ direct subconcepts of ⊤ and ∃R.⊤ for every object property R
    pub fn refine_thing(&self) -> Result<BTreeSet<Concept>, LearnError> {
        let thing = self.kb.thing();
        let mut refinements = self.kb.direct_subconcepts(&thing)?;
        for role in self.kb.object_properties() {
            refinements.insert(self.kb.existential_restriction(&thing, &role)?);
        }
        Ok(refinements)
    }

    /// C ↦ direct subconcepts of C and C ⊓ ⊤
    fn refine_atomic(&self, concept: &Concept) -> Result<BTreeSet<Concept>, LearnError> {
        let mut refinements = self.kb.direct_subconcepts(concept)?;
        refinements.insert(self.kb.intersection(concept, &self.kb.thing())?);
        Ok(refinements)
    }

    /// ∃R.D ↦ ∃R.D' for every refinement D' of D
    fn refine_existential_restriction(&self, role: &OwlIri, filler: &Concept) -> Result<BTreeSet<Concept>, LearnError> {
        self.refine(filler)?
            .iter()
            .map(|refined| self.kb.existential_restriction(refined, role).map_err(LearnError::from))
            .collect()
    }

    /// C ⊓ D ↦ C ⊓ D' and C' ⊓ D, refining one operand at a time
    fn refine_intersection(&self, left: &Concept, right: &Concept) -> Result<BTreeSet<Concept>, LearnError> {
        let mut refinements = BTreeSet::new();
        for refined in self.refine(right)? {
            refinements.insert(self.kb.intersection(left, &refined)?);
        }
        for refined in self.refine(left)? {
            refinements.insert(self.kb.intersection(&refined, right)?);
        }
        Ok(refinements)
    }
}
