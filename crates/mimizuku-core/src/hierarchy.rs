//! Named class hierarchy

use crate::model::{Ontology, Class, Axiom, OwlIri};
use std::collections::{BTreeMap, BTreeSet};

/// Subsumption hierarchy over named classes.
///
/// Equivalent classes subsume each other, so neither is strictly below the
/// other and neither is a direct subclass of the other.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    /// Transitive superclasses of each class
    supers: BTreeMap<OwlIri, BTreeSet<OwlIri>>,
    direct_subs: BTreeMap<OwlIri, BTreeSet<OwlIri>>,
    roots: BTreeSet<OwlIri>,
}

impl ClassHierarchy {
    pub fn from_ontology(ontology: &Ontology) -> Self {
        let mut supers: BTreeMap<OwlIri, BTreeSet<OwlIri>> = ontology
            .named_classes()
            .map(|iri| (iri.clone(), BTreeSet::new()))
            .collect();

        for axiom in &ontology.axioms {
            match axiom {
                Axiom::SubClassOf(Class::Named(sub), Class::Named(sup)) => {
                    supers.entry(sub.clone()).or_default().insert(sup.clone());
                }
                Axiom::EquivalentClasses(classes) => {
                    let named: Vec<&OwlIri> = classes
                        .iter()
                        .filter_map(|c| match c {
                            Class::Named(iri) => Some(iri),
                            _ => None,
                        })
                        .collect();
                    for a in &named {
                        for b in &named {
                            if a != b {
                                supers.entry((*a).clone()).or_default().insert((*b).clone());
                            }
                        }
                    }
                }
                // ⊤ above and ⊥ below every class are implicit
                _ => {}
            }
        }

        compute_transitive_closure(&mut supers);

        let mut hierarchy = Self {
            supers,
            direct_subs: BTreeMap::new(),
            roots: BTreeSet::new(),
        };
        hierarchy.compute_direct_edges();
        hierarchy
    }

    fn compute_direct_edges(&mut self) {
        let mut direct_subs: BTreeMap<OwlIri, BTreeSet<OwlIri>> = BTreeMap::new();
        let mut roots = BTreeSet::new();

        for class in self.supers.keys() {
            let strict: Vec<&OwlIri> = self.supers[class]
                .iter()
                .filter(|sup| self.is_strict_subclass(class, sup))
                .collect();

            if strict.is_empty() {
                roots.insert(class.clone());
                continue;
            }

            for sup in &strict {
                let has_intermediate = strict
                    .iter()
                    .any(|mid| self.is_strict_subclass(mid, sup));
                if !has_intermediate {
                    direct_subs.entry((*sup).clone()).or_default().insert(class.clone());
                }
            }
        }

        self.direct_subs = direct_subs;
        self.roots = roots;
    }

    pub fn contains(&self, class: &OwlIri) -> bool {
        self.supers.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &OwlIri> {
        self.supers.keys()
    }

    pub fn len(&self) -> usize {
        self.supers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supers.is_empty()
    }

    /// `sub ⊑ sup` holds and `sup ⊑ sub` does not
    pub fn is_strict_subclass(&self, sub: &OwlIri, sup: &OwlIri) -> bool {
        let below = self.supers.get(sub).map_or(false, |s| s.contains(sup));
        let above = self.supers.get(sup).map_or(false, |s| s.contains(sub));
        sub != sup && below && !above
    }

    /// Every named class subsumed by `class`, including `class` itself
    pub fn subsumees(&self, class: &OwlIri) -> BTreeSet<OwlIri> {
        let mut result: BTreeSet<OwlIri> = self
            .supers
            .iter()
            .filter(|(_, sups)| sups.contains(class))
            .map(|(sub, _)| sub.clone())
            .collect();
        result.insert(class.clone());
        result
    }

    /// Classes with no named class strictly above them
    pub fn roots(&self) -> &BTreeSet<OwlIri> {
        &self.roots
    }

    pub fn direct_subclasses(&self, class: &OwlIri) -> BTreeSet<OwlIri> {
        self.direct_subs.get(class).cloned().unwrap_or_default()
    }
}

/// Compute transitive closure of subsumption relations
fn compute_transitive_closure(subsumption_map: &mut BTreeMap<OwlIri, BTreeSet<OwlIri>>) {
    let mut changed = true;
    while changed {
        changed = false;
        let current_map = subsumption_map.clone();

        for (subclass, direct_supers) in &current_map {
            for direct_super in direct_supers {
                if let Some(indirect_supers) = current_map.get(direct_super) {
                    for indirect_super in indirect_supers {
                        if subsumption_map
                            .entry(subclass.clone())
                            .or_default()
                            .insert(indirect_super.clone())
                        {
                            changed = true;
                        }
                    }
                }
            }
        }
    }
}
