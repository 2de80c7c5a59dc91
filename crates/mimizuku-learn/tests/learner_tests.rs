//! Tests for the mimizuku-learn crate

use mimizuku_core::*;
use mimizuku_learn::*;
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::BTreeSet;

fn iri(name: &str) -> OwlIri {
    OwlIri::new(format!("http://example.org/{}", name))
}

fn ind(name: &str) -> Individual {
    Individual(iri(name))
}

fn named(name: &str) -> Class {
    Class::Named(iri(name))
}

fn set(names: &[&str]) -> BTreeSet<Individual> {
    names.iter().map(|n| ind(n)).collect()
}

/// Knowledge base that counts how often the hierarchy is consulted
struct CountingKb {
    inner: OntologyKnowledgeBase,
    subconcept_calls: Cell<usize>,
}

impl CountingKb {
    fn new(ontology: &Ontology) -> Self {
        Self {
            inner: OntologyKnowledgeBase::new(ontology),
            subconcept_calls: Cell::new(0),
        }
    }
}

impl KnowledgeBase for CountingKb {
    fn thing(&self) -> Concept {
        self.inner.thing()
    }

    fn atomic(&self, class: &OwlIri) -> Result<Concept, KnowledgeBaseError> {
        self.inner.atomic(class)
    }

    fn direct_subconcepts(&self, concept: &Concept) -> Result<BTreeSet<Concept>, KnowledgeBaseError> {
        self.subconcept_calls.set(self.subconcept_calls.get() + 1);
        self.inner.direct_subconcepts(concept)
    }

    fn object_properties(&self) -> BTreeSet<OwlIri> {
        self.inner.object_properties()
    }

    fn existential_restriction(&self, filler: &Concept, role: &OwlIri) -> Result<Concept, KnowledgeBaseError> {
        self.inner.existential_restriction(filler, role)
    }

    fn intersection(&self, a: &Concept, b: &Concept) -> Result<Concept, KnowledgeBaseError> {
        self.inner.intersection(a, b)
    }
}

/// ⊤ ⊒ X, Y; role R; i1, i2: X; i3: Y
fn scenario_ontology() -> Ontology {
    let mut ontology = Ontology::new();
    ontology.properties.insert(Property::Object(iri("R")));
    ontology.add_axiom(Axiom::ClassAssertion(named("X"), ind("i1")));
    ontology.add_axiom(Axiom::ClassAssertion(named("X"), ind("i2")));
    ontology.add_axiom(Axiom::ClassAssertion(named("Y"), ind("i3")));
    ontology
}

/// Deeper family ontology used for the multi-round searches
fn family_ontology() -> Ontology {
    let mut ontology = Ontology::new();
    let has_child = Property::Object(iri("hasChild"));
    ontology.properties.insert(has_child.clone());
    ontology.add_axiom(Axiom::SubClassOf(named("Male"), named("Person")));
    ontology.add_axiom(Axiom::SubClassOf(named("Female"), named("Person")));
    for (individual, class) in [
        ("anna", "Female"),
        ("bob", "Male"),
        ("carl", "Male"),
        ("dora", "Female"),
        ("emil", "Male"),
        ("fay", "Female"),
    ] {
        ontology.add_axiom(Axiom::ClassAssertion(named(class), ind(individual)));
    }
    for (parent, child) in [("anna", "carl"), ("bob", "carl"), ("dora", "emil"), ("emil", "fay")] {
        ontology.add_axiom(Axiom::ObjectPropertyAssertion(has_child.clone(), ind(parent), ind(child)));
    }
    ontology
}

#[test]
fn test_scenario_seed_candidates() {
    let kb = OntologyKnowledgeBase::new(&scenario_ontology());
    let operator = ElRefinementOperator::new(&kb);

    let seeds: Vec<String> = operator.refine(&kb.thing()).unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(seeds, vec!["X", "Y", "∃R.⊤"]);
}

#[test]
fn test_scenario_terminates_on_goal_without_refining() {
    let kb = CountingKb::new(&scenario_ontology());
    let learner = ConceptLearner::new(&kb, LearnerConfig::default().with_terminate_on_goal(true));

    let best = learner.run_algorithm(&set(&["i1", "i2"]), &set(&["i3"])).unwrap();
    assert_eq!(best.concept.to_string(), "X");
    assert_eq!(best.score, 1.0);
    // Only the seed refinement of ⊤ consulted the hierarchy
    assert_eq!(kb.subconcept_calls.get(), 1);
}

#[test]
fn test_zero_steps_never_refines_beyond_seed() {
    let kb = CountingKb::new(&family_ontology());
    let learner = ConceptLearner::new(&kb, LearnerConfig::default().with_steps(0));

    let outcome = learner.search(&set(&["anna", "dora"]), &set(&["bob", "fay"])).unwrap();
    assert_eq!(kb.subconcept_calls.get(), 1);
    assert_eq!(outcome.rounds, 0);
    assert!(!outcome.reached_goal);
}

#[test]
fn test_more_steps_never_worsen_the_result() {
    let kb = OntologyKnowledgeBase::new(&family_ontology());
    let pos = set(&["anna", "dora"]);
    let neg = set(&["bob", "carl", "fay"]);

    let mut previous = 0.0;
    for steps in 0..4 {
        let learner = ConceptLearner::new(&kb, LearnerConfig::default().with_steps(steps));
        let best = learner.run_algorithm(&pos, &neg).unwrap();
        assert!(best.score >= previous, "steps={} lowered the score", steps);
        previous = best.score;
    }
    // Female mothers: (Female ⊓ ∃hasChild.⊤)
    assert_eq!(previous, 1.0);
}

#[test]
fn test_multi_round_search_finds_mothers() {
    let kb = OntologyKnowledgeBase::new(&family_ontology());
    let learner = ConceptLearner::new(&kb, LearnerConfig::default().with_steps(3).with_terminate_on_goal(true));

    let outcome = learner.search(&set(&["anna", "dora"]), &set(&["bob", "carl", "fay"])).unwrap();
    assert!(outcome.reached_goal);
    assert_eq!(outcome.best.score, 1.0);
    let mothers = outcome.best.concept.instances().clone();
    assert!(mothers.is_superset(&set(&["anna", "dora"])));
    assert!(mothers.is_disjoint(&set(&["bob", "carl", "fay"])));
}

#[test]
fn test_search_is_deterministic() {
    let kb = OntologyKnowledgeBase::new(&family_ontology());
    let learner = ConceptLearner::new(&kb, LearnerConfig::default().with_steps(3));
    let pos = set(&["bob", "emil"]);
    let neg = set(&["anna", "fay"]);

    let first = learner.run_algorithm(&pos, &neg).unwrap();
    for _ in 0..5 {
        let again = learner.run_algorithm(&pos, &neg).unwrap();
        assert_eq!(again.concept, first.concept);
        assert_eq!(again.score, first.score);
    }
}

#[test]
fn test_tie_break_keeps_challenger() {
    let kb = OntologyKnowledgeBase::new(&scenario_ontology());
    let x = kb.atomic(&iri("X")).unwrap();
    let y = kb.atomic(&iri("Y")).unwrap();
    let incumbent = ScoredConcept::new(kb.intersection(&x, &kb.thing()).unwrap(), 0.8);
    let challenger = ScoredConcept::new(kb.intersection(&y, &kb.thing()).unwrap(), 0.8);

    assert_eq!(incumbent.concept.length(), 3);
    assert_eq!(challenger.concept.length(), 3);
    assert!(challenger.is_better_than(&incumbent));
}

/// Knowledge base without classes whose roles are only visible for the
/// first `role_lookups` calls, so ⊤ stops having refinements after the seed
struct BareKb {
    individuals: BTreeSet<Individual>,
    members: BTreeSet<Individual>,
    role_lookups: Cell<usize>,
}

impl BareKb {
    fn new(role_lookups: usize) -> Self {
        Self {
            individuals: set(&["a", "b", "c"]),
            members: set(&["a", "c"]),
            role_lookups: Cell::new(role_lookups),
        }
    }
}

impl KnowledgeBase for BareKb {
    fn thing(&self) -> Concept {
        Concept::new(ConceptKind::Thing, self.individuals.clone())
    }

    fn atomic(&self, class: &OwlIri) -> Result<Concept, KnowledgeBaseError> {
        Err(KnowledgeBaseError::UnknownClass(class.clone()))
    }

    fn direct_subconcepts(&self, _concept: &Concept) -> Result<BTreeSet<Concept>, KnowledgeBaseError> {
        Ok(BTreeSet::new())
    }

    fn object_properties(&self) -> BTreeSet<OwlIri> {
        let remaining = self.role_lookups.get();
        if remaining == 0 {
            return BTreeSet::new();
        }
        self.role_lookups.set(remaining - 1);
        [iri("R")].into_iter().collect()
    }

    fn existential_restriction(&self, filler: &Concept, role: &OwlIri) -> Result<Concept, KnowledgeBaseError> {
        let instances = if filler.is_thing() { self.members.clone() } else { BTreeSet::new() };
        Ok(Concept::new(ConceptKind::Existential { role: role.clone(), filler: filler.clone() }, instances))
    }

    fn intersection(&self, a: &Concept, b: &Concept) -> Result<Concept, KnowledgeBaseError> {
        let instances = a.instances().intersection(b.instances()).cloned().collect();
        Ok(Concept::new(ConceptKind::Intersection { left: a.clone(), right: b.clone() }, instances))
    }
}

#[test]
fn test_existential_over_unrefinable_filler_has_no_refinements() {
    let kb = BareKb::new(0);
    let operator = ElRefinementOperator::new(&kb);

    assert!(operator.refine(&kb.thing()).unwrap().is_empty());
    let exists = kb.existential_restriction(&kb.thing(), &iri("R")).unwrap();
    assert!(operator.refine(&exists).unwrap().is_empty());
}

#[test]
fn test_dead_end_frontier_keeps_seed_best() {
    let kb = BareKb::new(1);
    let learner = ConceptLearner::new(&kb, LearnerConfig::default().with_steps(3));

    let outcome = learner.search(&set(&["a"]), &set(&["b", "c"])).unwrap();
    // ⊤ and ∃R.⊤ only; refining ∃R.⊤ in round 1 yields nothing
    assert_eq!(outcome.evaluated, 2);
    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.best.concept.to_string(), "∃R.⊤");
    assert_eq!(outcome.best.score, 0.667);
    assert!(!outcome.reached_goal);
}

/// Shape of a generated concept, materialized against a knowledge base
#[derive(Debug, Clone)]
enum Shape {
    Thing,
    Atomic(&'static str),
    Exists(Box<Shape>),
    And(Box<Shape>, Box<Shape>),
}

impl Shape {
    fn build(&self, kb: &OntologyKnowledgeBase) -> Concept {
        match self {
            Shape::Thing => kb.thing(),
            Shape::Atomic(name) => kb.atomic(&iri(name)).unwrap(),
            Shape::Exists(filler) => kb.existential_restriction(&filler.build(kb), &iri("hasChild")).unwrap(),
            Shape::And(left, right) => kb.intersection(&left.build(kb), &right.build(kb)).unwrap(),
        }
    }
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Thing),
        Just(Shape::Atomic("Person")),
        Just(Shape::Atomic("Male")),
        Just(Shape::Atomic("Female")),
    ];
    leaf.prop_recursive(3, 8, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|filler| Shape::Exists(Box::new(filler))),
            (inner.clone(), inner).prop_map(|(a, b)| Shape::And(Box::new(a), Box::new(b))),
        ]
    })
}

#[test]
fn prop_refinement_laws() {
    let kb = OntologyKnowledgeBase::new(&family_ontology());
    let operator = ElRefinementOperator::new(&kb);

    proptest!(|(shape in shape_strategy())| {
        let concept = shape.build(&kb);
        let refinements = operator.refine(&concept).unwrap();
        match concept.kind() {
            ConceptKind::Existential { role, filler } => {
                let expected: BTreeSet<Concept> = operator
                    .refine(filler)
                    .unwrap()
                    .iter()
                    .map(|d| kb.existential_restriction(d, role).unwrap())
                    .collect();
                prop_assert_eq!(refinements, expected);
            }
            ConceptKind::Intersection { left, right } => {
                let mut expected = BTreeSet::new();
                for d in operator.refine(right).unwrap() {
                    expected.insert(kb.intersection(left, &d).unwrap());
                }
                for c in operator.refine(left).unwrap() {
                    expected.insert(kb.intersection(&c, right).unwrap());
                }
                prop_assert_eq!(refinements, expected);
            }
            _ => prop_assert!(!refinements.is_empty()),
        }
    });
}

#[test]
fn prop_refinements_are_specializations() {
    let kb = OntologyKnowledgeBase::new(&family_ontology());
    let operator = ElRefinementOperator::new(&kb);

    proptest!(|(shape in shape_strategy())| {
        let concept = shape.build(&kb);
        for refined in operator.refine(&concept).unwrap() {
            prop_assert!(refined.instances().is_subset(concept.instances()));
            prop_assert!(refined.length() >= concept.length());
        }
    });
}

proptest! {
    #[test]
    fn prop_f1_is_bounded(
        members in prop::collection::btree_set(0..10usize, 0..10),
        positives in prop::collection::btree_set(0..10usize, 1..6),
    ) {
        let name = |i: &usize| ind(&format!("n{}", i));
        let concept = Concept::new(
            ConceptKind::Atomic(iri("Probe")),
            members.iter().map(name).collect(),
        );
        let pos: BTreeSet<Individual> = positives.iter().map(name).collect();
        let neg: BTreeSet<Individual> = (0..10usize).filter(|i| !positives.contains(i)).map(|i| name(&i)).collect();

        let score = f1(&concept, &pos, &neg).unwrap();
        prop_assert!((0.0..=1.0).contains(&score));
        if members == positives {
            prop_assert_eq!(score, 1.0);
        }
    }
}
