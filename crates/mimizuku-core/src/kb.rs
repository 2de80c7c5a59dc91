//! Knowledge base service for EL concept learning

use crate::concept::{Concept, ConceptKind};
use crate::hierarchy::ClassHierarchy;
use crate::model::{Ontology, Class, Property, Individual, Axiom, OwlIri};
use crate::KnowledgeBaseError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Capabilities the refinement operator and the search need from a
/// knowledge base. Instance sets of the concepts it hands out must not
/// change for the lifetime of the knowledge base.
pub trait KnowledgeBase {
    /// The unique ⊤ concept
    fn thing(&self) -> Concept;

    /// Atomic concept for a named class
    fn atomic(&self, class: &OwlIri) -> Result<Concept, KnowledgeBaseError>;

    /// Concepts directly below `concept`; empty unless it is ⊤ or atomic
    fn direct_subconcepts(&self, concept: &Concept) -> Result<BTreeSet<Concept>, KnowledgeBaseError>;

    fn object_properties(&self) -> BTreeSet<OwlIri>;

    /// ∃role.filler
    fn existential_restriction(&self, filler: &Concept, role: &OwlIri) -> Result<Concept, KnowledgeBaseError>;

    /// a ⊓ b
    fn intersection(&self, a: &Concept, b: &Concept) -> Result<Concept, KnowledgeBaseError>;
}

/// In-memory knowledge base over a loaded ontology.
///
/// Instances are computed by closed-world retrieval over the asserted facts:
/// an individual belongs to a named class if it is asserted to any class the
/// hierarchy places below it, to ∃R.D if it has an asserted R-successor in D,
/// and to C ⊓ D if it belongs to both. Constructed concepts are interned.
pub struct OntologyKnowledgeBase {
    hierarchy: ClassHierarchy,
    roles: BTreeSet<OwlIri>,
    individuals: BTreeSet<Individual>,
    /// Asserted (subject, object) pairs per object property
    edges: BTreeMap<OwlIri, Vec<(Individual, Individual)>>,
    thing: Concept,
    concepts: RwLock<HashMap<ConceptKind, Concept>>,
}

impl OntologyKnowledgeBase {
    pub fn new(ontology: &Ontology) -> Self {
        let hierarchy = ClassHierarchy::from_ontology(ontology);
        let roles: BTreeSet<OwlIri> = ontology.object_properties().cloned().collect();
        let individuals: BTreeSet<Individual> = ontology.individuals.iter().cloned().collect();

        let mut asserted: BTreeMap<OwlIri, BTreeSet<Individual>> = BTreeMap::new();
        let mut edges: BTreeMap<OwlIri, Vec<(Individual, Individual)>> = BTreeMap::new();
        for axiom in &ontology.axioms {
            match axiom {
                Axiom::ClassAssertion(Class::Named(class), individual) => {
                    asserted.entry(class.clone()).or_default().insert(individual.clone());
                }
                Axiom::ObjectPropertyAssertion(Property::Object(role), subject, object) => {
                    edges.entry(role.clone()).or_default().push((subject.clone(), object.clone()));
                }
                _ => {}
            }
        }

        let thing = Concept::new(ConceptKind::Thing, individuals.clone());
        let mut concepts = HashMap::new();
        concepts.insert(ConceptKind::Thing, thing.clone());
        concepts.insert(ConceptKind::Nothing, Concept::new(ConceptKind::Nothing, BTreeSet::new()));

        for class in hierarchy.classes() {
            let instances: BTreeSet<Individual> = hierarchy
                .subsumees(class)
                .iter()
                .filter_map(|sub| asserted.get(sub))
                .flatten()
                .cloned()
                .collect();
            let kind = ConceptKind::Atomic(class.clone());
            concepts.insert(kind.clone(), Concept::new(kind, instances));
        }

        info!(
            "Built knowledge base: {} classes, {} object properties, {} individuals",
            hierarchy.len(),
            roles.len(),
            individuals.len()
        );

        Self {
            hierarchy,
            roles,
            individuals,
            edges,
            thing,
            concepts: RwLock::new(concepts),
        }
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    /// All individuals, i.e. the instances of ⊤
    pub fn individuals(&self) -> &BTreeSet<Individual> {
        &self.individuals
    }

    /// The ⊥ concept. It has no refinements.
    pub fn nothing(&self) -> Concept {
        self.intern(ConceptKind::Nothing, BTreeSet::new)
    }

    /// Number of distinct concepts built so far
    pub fn interned_count(&self) -> usize {
        self.concepts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn intern(&self, kind: ConceptKind, instances: impl FnOnce() -> BTreeSet<Individual>) -> Concept {
        if let Some(concept) = self.concepts.read().unwrap_or_else(PoisonError::into_inner).get(&kind) {
            return concept.clone();
        }

        let mut concepts = self.concepts.write().unwrap_or_else(PoisonError::into_inner);
        concepts
            .entry(kind)
            .or_insert_with_key(|kind| Concept::new(kind.clone(), instances()))
            .clone()
    }
}

impl KnowledgeBase for OntologyKnowledgeBase {
    fn thing(&self) -> Concept {
        self.thing.clone()
    }

    fn atomic(&self, class: &OwlIri) -> Result<Concept, KnowledgeBaseError> {
        self.concepts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ConceptKind::Atomic(class.clone()))
            .cloned()
            .ok_or_else(|| KnowledgeBaseError::UnknownClass(class.clone()))
    }

    fn direct_subconcepts(&self, concept: &Concept) -> Result<BTreeSet<Concept>, KnowledgeBaseError> {
        let classes = match concept.kind() {
            ConceptKind::Thing => self.hierarchy.roots().clone(),
            ConceptKind::Atomic(class) => {
                if !self.hierarchy.contains(class) {
                    return Err(KnowledgeBaseError::UnknownClass(class.clone()));
                }
                self.hierarchy.direct_subclasses(class)
            }
            _ => return Ok(BTreeSet::new()),
        };

        classes.iter().map(|class| self.atomic(class)).collect()
    }

    fn object_properties(&self) -> BTreeSet<OwlIri> {
        self.roles.clone()
    }

    fn existential_restriction(&self, filler: &Concept, role: &OwlIri) -> Result<Concept, KnowledgeBaseError> {
        if !self.roles.contains(role) {
            return Err(KnowledgeBaseError::UnknownRole(role.clone()));
        }

        let kind = ConceptKind::Existential { role: role.clone(), filler: filler.clone() };
        Ok(self.intern(kind, || {
            self.edges
                .get(role)
                .into_iter()
                .flatten()
                .filter(|(_, object)| filler.instances().contains(object))
                .map(|(subject, _)| subject.clone())
                .collect()
        }))
    }

    fn intersection(&self, a: &Concept, b: &Concept) -> Result<Concept, KnowledgeBaseError> {
        let kind = ConceptKind::Intersection { left: a.clone(), right: b.clone() };
        Ok(self.intern(kind, || a.instances().intersection(b.instances()).cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(name: &str) -> OwlIri {
        OwlIri::new(format!("http://example.org/{}", name))
    }

    fn ind(name: &str) -> Individual {
        Individual(iri(name))
    }

    fn named(name: &str) -> Class {
        Class::Named(iri(name))
    }

    /// Person ⊒ Parent; mary: Parent, john: Person, rex: Dog; mary hasChild john
    fn create_test_kb() -> OntologyKnowledgeBase {
        let mut ontology = Ontology::new();
        ontology.properties.insert(Property::Object(iri("hasChild")));
        ontology.properties.insert(Property::Data(iri("hasAge")));
        ontology.add_axiom(Axiom::SubClassOf(named("Parent"), named("Person")));
        ontology.add_axiom(Axiom::ClassAssertion(named("Parent"), ind("mary")));
        ontology.add_axiom(Axiom::ClassAssertion(named("Person"), ind("john")));
        ontology.add_axiom(Axiom::ClassAssertion(named("Dog"), ind("rex")));
        ontology.add_axiom(Axiom::ObjectPropertyAssertion(
            Property::Object(iri("hasChild")),
            ind("mary"),
            ind("john"),
        ));
        OntologyKnowledgeBase::new(&ontology)
    }

    fn set(names: &[&str]) -> BTreeSet<Individual> {
        names.iter().map(|n| ind(n)).collect()
    }

    #[test]
    fn test_thing_has_all_individuals() {
        let kb = create_test_kb();
        assert_eq!(kb.thing().instances(), &set(&["john", "mary", "rex"]));
        assert!(kb.thing().is_thing());
    }

    #[test]
    fn test_atomic_instances_include_subclass_members() {
        let kb = create_test_kb();
        let person = kb.atomic(&iri("Person")).unwrap();
        assert_eq!(person.instances(), &set(&["john", "mary"]));

        let err = kb.atomic(&iri("Unicorn")).unwrap_err();
        assert_eq!(err, KnowledgeBaseError::UnknownClass(iri("Unicorn")));
    }

    #[test]
    fn test_direct_subconcepts() {
        let kb = create_test_kb();

        let below_thing: Vec<String> = kb.direct_subconcepts(&kb.thing()).unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(below_thing, vec!["Dog", "Person"]);

        let person = kb.atomic(&iri("Person")).unwrap();
        let below_person = kb.direct_subconcepts(&person).unwrap();
        assert_eq!(below_person.into_iter().collect::<Vec<_>>(), vec![kb.atomic(&iri("Parent")).unwrap()]);

        let exists = kb.existential_restriction(&kb.thing(), &iri("hasChild")).unwrap();
        assert!(kb.direct_subconcepts(&exists).unwrap().is_empty());
    }

    #[test]
    fn test_object_properties_exclude_data_properties() {
        let kb = create_test_kb();
        assert_eq!(kb.object_properties(), [iri("hasChild")].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_existential_restriction_instances() {
        let kb = create_test_kb();
        let has_child_thing = kb.existential_restriction(&kb.thing(), &iri("hasChild")).unwrap();
        assert_eq!(has_child_thing.instances(), &set(&["mary"]));
        assert_eq!(has_child_thing.length(), 3);

        let dog = kb.atomic(&iri("Dog")).unwrap();
        let has_child_dog = kb.existential_restriction(&dog, &iri("hasChild")).unwrap();
        assert!(has_child_dog.instances().is_empty());

        let err = kb.existential_restriction(&dog, &iri("hasOwner")).unwrap_err();
        assert_eq!(err, KnowledgeBaseError::UnknownRole(iri("hasOwner")));
    }

    #[test]
    fn test_intersection_instances() {
        let kb = create_test_kb();
        let person = kb.atomic(&iri("Person")).unwrap();
        let has_child = kb.existential_restriction(&kb.thing(), &iri("hasChild")).unwrap();

        let both = kb.intersection(&person, &has_child).unwrap();
        assert_eq!(both.instances(), &set(&["mary"]));
        assert_eq!(both.to_string(), "(Person ⊓ ∃hasChild.⊤)");
    }

    #[test]
    fn test_constructed_concepts_are_interned() {
        let kb = create_test_kb();
        let before = kb.interned_count();

        let a = kb.existential_restriction(&kb.thing(), &iri("hasChild")).unwrap();
        let b = kb.existential_restriction(&kb.thing(), &iri("hasChild")).unwrap();
        assert_eq!(a, b);
        assert_eq!(kb.interned_count(), before + 1);
    }

    #[test]
    fn test_nothing_is_empty() {
        let kb = create_test_kb();
        assert!(kb.nothing().instances().is_empty());
        assert!(kb.direct_subconcepts(&kb.nothing()).unwrap().is_empty());
    }
}
