//! Concept ownership: who claims each concept, who reuses it, and whether that agrees with
//! the registry.

use crate::report::{Finding, FindingCode, ReportBuilder};
use std::collections::{BTreeMap, BTreeSet};
use syllabus_model::{ConceptId, ConceptRegistry, LessonId, LessonRecord};

/// Ownership and reuse derived from lesson records alone.
///
/// Owners are listed in the order lessons were folded in (lesson-id order for a loaded
/// corpus), each lesson at most once per concept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    owners: BTreeMap<ConceptId, Vec<LessonId>>,
    reusers: BTreeMap<ConceptId, BTreeSet<LessonId>>,
}

impl OwnershipIndex {
    pub fn from_lessons<'a>(lessons: impl IntoIterator<Item = &'a LessonRecord>) -> Self {
        lessons.into_iter().fold(Self::default(), |mut acc, lesson| {
            for concept in lesson.ownership_claims() {
                let owners = acc.owners.entry(concept.clone()).or_default();
                if !owners.contains(&lesson.id) {
                    owners.push(lesson.id.clone());
                }
            }
            for concept in lesson.reused_concepts() {
                acc.reusers
                    .entry(concept.clone())
                    .or_default()
                    .insert(lesson.id.clone());
            }
            acc
        })
    }

    /// Lessons claiming the concept (empty when none do).
    pub fn owners(&self, concept: &str) -> &[LessonId] {
        self.owners.get(concept).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct lessons listing the concept in `concepts_reused`.
    pub fn reuse_count(&self, concept: &str) -> usize {
        self.reusers.get(concept).map(BTreeSet::len).unwrap_or(0)
    }

    /// Every claimed concept with its owners, by concept id.
    pub fn iter_owners(&self) -> impl Iterator<Item = (&ConceptId, &[LessonId])> {
        self.owners.iter().map(|(c, o)| (c, o.as_slice()))
    }
}

/// One error per (lesson, concept) for every concept id the registry does not know, whichever
/// of the three lists it appears in.
pub fn check_concept_references<'a>(
    lessons: impl IntoIterator<Item = &'a LessonRecord>,
    registry: &ConceptRegistry,
    report: &mut ReportBuilder,
) {
    for lesson in lessons {
        for concept in lesson.referenced_concepts() {
            if registry.contains(concept.as_str()) {
                continue;
            }
            report.error(
                Finding::new(
                    FindingCode::UnknownConcept,
                    format!(
                        "Unknown concept '{concept}' referenced in lesson '{}'",
                        lesson.id
                    ),
                )
                .with_lesson(&lesson.id)
                .with_concept(concept),
            );
        }
    }
}

/// Multi-owner errors (by concept id), then registry/lesson owner mismatch warnings (in
/// registry order).
pub fn check_ownership(index: &OwnershipIndex, registry: &ConceptRegistry, report: &mut ReportBuilder) {
    for (concept, owners) in index.iter_owners() {
        if owners.len() < 2 {
            continue;
        }
        let names: Vec<&str> = owners.iter().map(LessonId::as_str).collect();
        report.error(
            Finding::new(
                FindingCode::MultipleOwners,
                format!(
                    "Concept '{concept}' has multiple canonical owners: {}",
                    names.join(", ")
                ),
            )
            .with_concept(concept)
            .with_lessons(owners.to_vec()),
        );
    }

    for (concept, declared) in registry.declared_canonicals() {
        let [owner] = index.owners(concept.as_str()) else {
            continue;
        };
        if owner == declared {
            continue;
        }
        report.warning(
            Finding::new(
                FindingCode::RegistryOwnerMismatch,
                format!(
                    "Concept '{concept}': registry canonical '{declared}' differs from lesson-declared owner '{owner}'"
                ),
            )
            .with_lesson(owner)
            .with_concept(concept)
            .with_lessons(vec![declared.clone(), owner.clone()]),
        );
    }
}
