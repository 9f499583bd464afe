//! Curriculum consistency checks
//!
//! Treats a lesson corpus plus the concept registry as a constrained graph and reports, without
//! changing anything:
//!
//! - **errors**: unknown concept ids, concepts claimed by more than one lesson;
//! - **warnings**: registry/lesson owner disagreement, dependency cycles, uncovered concepts,
//!   defaulted lesson metadata, duplicate lesson/concept ids;
//! - **notes**: canonical concepts no other lesson reuses.
//!
//! A run fails iff it produced errors. A missing or unreadable registry, or a missing lessons
//! directory, yields a report with that single error and nothing else.

use serde::{Deserialize, Serialize};
use std::path::Path;
use syllabus_ingest::{load_corpus, load_registry, LessonCorpus, LoadOptions, RegistryError};
use syllabus_model::ConceptRegistry;

pub mod coverage;
pub mod graph;
pub mod integrity;
pub mod ownership;
pub mod report;

pub use graph::{DependencyGraph, Edge, EdgeKind};
pub use ownership::OwnershipIndex;
pub use report::{Finding, FindingCode, ReportBuilder, ReportSummary, Severity, ValidationReport};

/// How many dependency cycles a run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleReporting {
    /// Stop at the first back-edge.
    #[default]
    First,
    /// One warning per back-edge found in a single depth-first pass.
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    pub cycle_reporting: CycleReporting,
}

/// Validate an already-loaded corpus against a registry.
pub fn validate(
    corpus: &LessonCorpus,
    registry: &ConceptRegistry,
    options: &CheckOptions,
) -> ValidationReport {
    let mut report = ReportBuilder::default();

    let index = OwnershipIndex::from_lessons(corpus.records());
    ownership::check_concept_references(corpus.records(), registry, &mut report);
    ownership::check_ownership(&index, registry, &mut report);

    let graph = DependencyGraph::build(corpus.records(), registry);
    graph::check_cycles(&graph, options.cycle_reporting, &mut report);

    coverage::check_coverage(registry, &index, &mut report);

    // Loader diagnostics come last within each section.
    integrity::check_input_integrity(corpus, registry, &mut report);

    let report = report.finish();
    let summary = report.summary();
    tracing::info!(
        lessons = corpus.len(),
        concepts = registry.len(),
        errors = summary.error_count,
        warnings = summary.warning_count,
        notes = summary.note_count,
        "curriculum validated"
    );
    report
}

/// Load the registry, then the corpus, then validate.
pub fn validate_paths(
    lessons_root: &Path,
    registry_path: &Path,
    load_options: &LoadOptions,
    options: &CheckOptions,
) -> ValidationReport {
    let registry = match load_registry(registry_path) {
        Ok(registry) => registry,
        Err(err) => {
            let code = match err {
                RegistryError::Missing(_) => FindingCode::RegistryMissing,
                _ => FindingCode::RegistryUnreadable,
            };
            tracing::warn!(error = %err, "concept registry unavailable; skipping all checks");
            return ValidationReport::fatal(code, err.to_string());
        }
    };

    let corpus = match load_corpus(lessons_root, load_options) {
        Ok(corpus) => corpus,
        Err(err) => {
            tracing::warn!(error = %err, "lesson corpus unavailable; skipping all checks");
            return ValidationReport::fatal(FindingCode::LessonsMissing, err.to_string());
        }
    };

    validate(&corpus, &registry, options)
}
