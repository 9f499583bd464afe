//! Findings and the three-tier validation report.

use serde::{Deserialize, Serialize};
use std::fmt;
use syllabus_model::{ConceptId, LessonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        })
    }
}

/// Stable machine-readable finding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    // structural (sole error, everything else skipped)
    RegistryMissing,
    RegistryUnreadable,
    LessonsMissing,
    // errors
    UnknownConcept,
    MultipleOwners,
    // warnings
    MalformedMetadata,
    DuplicateLessonId,
    DuplicateConcept,
    RegistryOwnerMismatch,
    DependencyCycle,
    UncoveredConcept,
    // notes
    UnreusedConcept,
}

impl FindingCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCode::RegistryMissing => "registry_missing",
            FindingCode::RegistryUnreadable => "registry_unreadable",
            FindingCode::LessonsMissing => "lessons_missing",
            FindingCode::UnknownConcept => "unknown_concept",
            FindingCode::MultipleOwners => "multiple_owners",
            FindingCode::MalformedMetadata => "malformed_metadata",
            FindingCode::DuplicateLessonId => "duplicate_lesson_id",
            FindingCode::DuplicateConcept => "duplicate_concept",
            FindingCode::RegistryOwnerMismatch => "registry_owner_mismatch",
            FindingCode::DependencyCycle => "dependency_cycle",
            FindingCode::UncoveredConcept => "uncovered_concept",
            FindingCode::UnreusedConcept => "unreused_concept",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem. `message` is the human-readable text; the other fields let
/// callers filter without parsing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<LessonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<ConceptId>,
    /// Conflicting owners, or the lesson path of a cycle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lessons: Vec<LessonId>,
}

impl Finding {
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            lesson: None,
            concept: None,
            lessons: Vec::new(),
        }
    }

    pub fn with_lesson(mut self, lesson: &LessonId) -> Self {
        self.lesson = Some(lesson.clone());
        self
    }

    pub fn with_concept(mut self, concept: &ConceptId) -> Self {
        self.concept = Some(concept.clone());
        self
    }

    pub fn with_lessons(mut self, lessons: Vec<LessonId>) -> Self {
        self.lessons = lessons;
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub note_count: usize,
}

/// Outcome of one validation run: errors, warnings and notes in the order the checks ran.
///
/// The run passes iff there are no errors; warnings and notes never affect the verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub notes: Vec<Finding>,
}

impl ValidationReport {
    /// Report for a run that could not start: exactly one error, nothing else.
    pub fn fatal(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            errors: vec![Finding::new(code, message)],
            ..Default::default()
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            error_count: self.errors.len(),
            warning_count: self.warnings.len(),
            note_count: self.notes.len(),
        }
    }

    pub fn section(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
            Severity::Note => &self.notes,
        }
    }

    /// Message texts of one section, in report order.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.section(severity)
            .iter()
            .map(|f| f.message.as_str())
            .collect()
    }

    /// Every finding with its severity: errors, then warnings, then notes.
    pub fn iter(&self) -> impl Iterator<Item = (Severity, &Finding)> {
        self.errors
            .iter()
            .map(|f| (Severity::Error, f))
            .chain(self.warnings.iter().map(|f| (Severity::Warning, f)))
            .chain(self.notes.iter().map(|f| (Severity::Note, f)))
    }
}

/// Append-only collector the checks write into.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: ValidationReport,
}

impl ReportBuilder {
    pub fn push(&mut self, severity: Severity, finding: Finding) {
        tracing::debug!(%severity, code = %finding.code, message = %finding.message, "finding");
        match severity {
            Severity::Error => self.report.errors.push(finding),
            Severity::Warning => self.report.warnings.push(finding),
            Severity::Note => self.report.notes.push(finding),
        }
    }

    pub fn error(&mut self, finding: Finding) {
        self.push(Severity::Error, finding);
    }

    pub fn warning(&mut self, finding: Finding) {
        self.push(Severity::Warning, finding);
    }

    pub fn note(&mut self, finding: Finding) {
        self.push(Severity::Note, finding);
    }

    pub fn finish(self) -> ValidationReport {
        self.report
    }
}
