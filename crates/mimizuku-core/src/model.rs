//! OWL data model

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// OWL IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OwlIri(pub String);

impl OwlIri {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment after `#`, otherwise the last path segment
    pub fn local_name(&self) -> &str {
        let iri = self.0.as_str();
        if let Some((_, fragment)) = iri.rsplit_once('#') {
            if !fragment.is_empty() {
                return fragment;
            }
        }
        match iri.trim_end_matches('/').rsplit_once('/') {
            Some((_, segment)) if !segment.is_empty() => segment,
            _ => iri,
        }
    }
}

impl std::fmt::Display for OwlIri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// OWL Class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Class {
    /// Named class
    Named(OwlIri),
    /// owl:Thing (⊤)
    Thing,
    /// owl:Nothing (⊥)
    Nothing,
}

/// OWL Property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Property {
    /// Object property
    Object(OwlIri),
    /// Data property
    Data(OwlIri),
}

impl Property {
    pub fn iri(&self) -> &OwlIri {
        match self {
            Property::Object(iri) | Property::Data(iri) => iri,
        }
    }
}

/// OWL Individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Individual(pub OwlIri);

impl Individual {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(OwlIri::new(iri))
    }

    pub fn iri(&self) -> &OwlIri {
        &self.0
    }
}

impl std::fmt::Display for Individual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RDF-style statement consumed by the loader
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// OWL Axiom (the subset EL learning reasons with)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axiom {
    /// SubClassOf(C1 C2)
    SubClassOf(Class, Class),

    /// EquivalentClasses(C1 ... Cn)
    EquivalentClasses(Vec<Class>),

    /// ClassAssertion(C i)
    ClassAssertion(Class, Individual),

    /// ObjectPropertyAssertion(P i1 i2)
    ObjectPropertyAssertion(Property, Individual, Individual),
}

/// OWL Ontology
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ontology {
    /// Ontology IRI
    pub iri: Option<OwlIri>,

    /// All axioms in the ontology
    pub axioms: Vec<Axiom>,

    /// All classes mentioned in the ontology
    pub classes: HashSet<Class>,

    /// All properties mentioned in the ontology
    pub properties: HashSet<Property>,

    /// All individuals mentioned in the ontology
    pub individuals: HashSet<Individual>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: OwlIri) -> Self {
        Self {
            iri: Some(iri),
            ..Self::default()
        }
    }

    pub fn add_axiom(&mut self, axiom: Axiom) {
        // Register every entity the axiom mentions
        match &axiom {
            Axiom::SubClassOf(c1, c2) => {
                self.classes.insert(c1.clone());
                self.classes.insert(c2.clone());
            }
            Axiom::EquivalentClasses(classes) => {
                self.classes.extend(classes.iter().cloned());
            }
            Axiom::ClassAssertion(c, i) => {
                self.classes.insert(c.clone());
                self.individuals.insert(i.clone());
            }
            Axiom::ObjectPropertyAssertion(p, i1, i2) => {
                self.properties.insert(p.clone());
                self.individuals.insert(i1.clone());
                self.individuals.insert(i2.clone());
            }
        }

        self.axioms.push(axiom);
    }

    /// Named classes, excluding owl:Thing and owl:Nothing
    pub fn named_classes(&self) -> impl Iterator<Item = &OwlIri> {
        self.classes.iter().filter_map(|class| match class {
            Class::Named(iri) => Some(iri),
            _ => None,
        })
    }

    pub fn object_properties(&self) -> impl Iterator<Item = &OwlIri> {
        self.properties.iter().filter_map(|property| match property {
            Property::Object(iri) => Some(iri),
            Property::Data(_) => None,
        })
    }
}
