//! Ontology loader

use crate::model::{Ontology, Class, Property, Individual, Axiom, OwlIri, Triple};
use crate::KnowledgeBaseError;
use tracing::debug;

// OWL/RDF vocabulary IRIs
const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";

/// Ontology loader trait
pub trait OntologyLoader {
    fn load_from_triples(&self, triples: &[Triple]) -> Result<Ontology, KnowledgeBaseError>;

    /// Load from a JSON array of `{subject, predicate, object}` objects
    fn load_from_json(&self, json: &str) -> Result<Ontology, KnowledgeBaseError> {
        let triples: Vec<Triple> = serde_json::from_str(json)
            .map_err(|e| KnowledgeBaseError::Loader(e.to_string()))?;
        self.load_from_triples(&triples)
    }
}

/// Maps declaration, subclass, equivalence and assertion triples to axioms
#[derive(Debug, Default, Clone, Copy)]
pub struct TripleOntologyLoader;

impl OntologyLoader for TripleOntologyLoader {
    fn load_from_triples(&self, triples: &[Triple]) -> Result<Ontology, KnowledgeBaseError> {
        let mut ontology = Ontology::new();

        // Declarations first, so assertions can be classified regardless of order
        for triple in triples.iter().filter(|t| t.predicate == RDF_TYPE) {
            match triple.object.as_str() {
                OWL_CLASS | RDFS_CLASS => {
                    ontology.classes.insert(class_for(&triple.subject));
                }
                OWL_OBJECT_PROPERTY => {
                    ontology.properties.insert(Property::Object(OwlIri::new(triple.subject.clone())));
                }
                OWL_DATATYPE_PROPERTY => {
                    ontology.properties.insert(Property::Data(OwlIri::new(triple.subject.clone())));
                }
                OWL_NAMED_INDIVIDUAL => {
                    ontology.individuals.insert(Individual::new(triple.subject.clone()));
                }
                OWL_ONTOLOGY => {
                    ontology.iri = Some(OwlIri::new(triple.subject.clone()));
                }
                _ => {}
            }
        }

        for triple in triples {
            if is_blank(&triple.subject) || is_blank(&triple.object) {
                debug!("Skipping triple with blank node: {:?}", triple);
                continue;
            }

            match triple.predicate.as_str() {
                RDF_TYPE => {
                    if triple.object == OWL_THING {
                        ontology.individuals.insert(Individual::new(triple.subject.clone()));
                    } else if !is_vocabulary(&triple.object) {
                        let class = Class::Named(OwlIri::new(triple.object.clone()));
                        let individual = Individual::new(triple.subject.clone());
                        ontology.add_axiom(Axiom::ClassAssertion(class, individual));
                    }
                }
                RDFS_SUBCLASS_OF => {
                    let c1 = class_for(&triple.subject);
                    let c2 = class_for(&triple.object);
                    ontology.add_axiom(Axiom::SubClassOf(c1, c2));
                }
                OWL_EQUIVALENT_CLASS => {
                    let c1 = class_for(&triple.subject);
                    let c2 = class_for(&triple.object);
                    ontology.add_axiom(Axiom::EquivalentClasses(vec![c1, c2]));
                }
                predicate => {
                    let property = Property::Object(OwlIri::new(predicate.to_string()));
                    if ontology.properties.contains(&property) {
                        let i1 = Individual::new(triple.subject.clone());
                        let i2 = Individual::new(triple.object.clone());
                        ontology.add_axiom(Axiom::ObjectPropertyAssertion(property, i1, i2));
                    } else {
                        debug!("Skipping triple with unmapped predicate: {}", predicate);
                    }
                }
            }
        }

        Ok(ontology)
    }
}

fn class_for(iri: &str) -> Class {
    match iri {
        OWL_THING => Class::Thing,
        OWL_NOTHING => Class::Nothing,
        _ => Class::Named(OwlIri::new(iri.to_string())),
    }
}

/// Terms of the OWL, RDF and RDFS vocabularies are never asserted classes
fn is_vocabulary(term: &str) -> bool {
    [OWL_NS, RDF_NS, RDFS_NS].iter().any(|ns| term.starts_with(ns))
}

fn is_blank(term: &str) -> bool {
    term.starts_with("_:")
}
