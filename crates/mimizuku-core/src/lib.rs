//! Mimizuku core
//!
//! Knowledge-base side of EL concept learning:
//! - OWL data model (classes, object properties, individuals, axioms)
//! - Triple loader mapping RDF-style statements to axioms
//! - Class hierarchy with direct sub-class lookup
//! - Interned EL concepts with cached instance sets

pub mod model;
pub mod loader;
pub mod hierarchy;
pub mod concept;
pub mod kb;

pub use model::{Ontology, Class, Property, Individual, Axiom, OwlIri, Triple};
pub use loader::{OntologyLoader, TripleOntologyLoader};
pub use hierarchy::ClassHierarchy;
pub use concept::{Concept, ConceptKind};
pub use kb::{KnowledgeBase, OntologyKnowledgeBase};

// Error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeBaseError {
    #[error("Loader error: {0}")]
    Loader(String),

    #[error("Unknown class: {0}")]
    UnknownClass(OwlIri),

    #[error("Unknown object property: {0}")]
    UnknownRole(OwlIri),
}
