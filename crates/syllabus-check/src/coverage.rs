//! Registry coverage: concepts nobody owns, canonical concepts nobody reuses.

use crate::ownership::OwnershipIndex;
use crate::report::{Finding, FindingCode, ReportBuilder};
use syllabus_model::ConceptRegistry;

/// Two independent passes over the registry (document order): uncovered concepts are
/// warnings, canonical-but-never-reused concepts are notes.
pub fn check_coverage(registry: &ConceptRegistry, index: &OwnershipIndex, report: &mut ReportBuilder) {
    for concept in registry.iter() {
        if !index.owners(concept.id.as_str()).is_empty() {
            continue;
        }
        report.warning(
            Finding::new(
                FindingCode::UncoveredConcept,
                format!(
                    "Coverage: concept '{}' has no canonical owner in lessons",
                    concept.id
                ),
            )
            .with_concept(&concept.id),
        );
    }

    for (concept, canonical) in registry.declared_canonicals() {
        if index.reuse_count(concept.as_str()) > 0 {
            continue;
        }
        report.note(
            Finding::new(
                FindingCode::UnreusedConcept,
                format!("Coverage: concept '{concept}' (owner '{canonical}') is not reused in any lesson"),
            )
            .with_lesson(canonical)
            .with_concept(concept),
        );
    }
}
