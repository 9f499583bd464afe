//! Warnings about the inputs themselves: lesson metadata the loader had to default,
//! lesson ids claimed by more than one file, concepts registered twice.

use crate::report::{Finding, FindingCode, ReportBuilder};
use std::collections::BTreeMap;
use syllabus_ingest::LessonCorpus;
use syllabus_model::{ConceptRegistry, LessonId};

pub fn check_input_integrity(corpus: &LessonCorpus, registry: &ConceptRegistry, report: &mut ReportBuilder) {
    for lesson in corpus.lessons() {
        for issue in &lesson.issues {
            report.warning(
                Finding::new(
                    FindingCode::MalformedMetadata,
                    format!(
                        "Lesson '{}' ({}): {issue}",
                        lesson.record.id, lesson.record.source
                    ),
                )
                .with_lesson(&lesson.record.id),
            );
        }
    }

    let mut sources: BTreeMap<&LessonId, Vec<&str>> = BTreeMap::new();
    for record in corpus.records() {
        sources
            .entry(&record.id)
            .or_default()
            .push(record.source.as_str());
    }
    for (id, paths) in sources {
        if paths.len() < 2 {
            continue;
        }
        report.warning(
            Finding::new(
                FindingCode::DuplicateLessonId,
                format!("Lesson id '{id}' is used by multiple files: {}", paths.join(", ")),
            )
            .with_lesson(id),
        );
    }

    for concept in registry.duplicates() {
        report.warning(
            Finding::new(
                FindingCode::DuplicateConcept,
                format!("Concept '{concept}' is listed more than once in the registry; the first entry is used"),
            )
            .with_concept(concept),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use syllabus_ingest::{LoadOptions, LoadedLesson};
    use syllabus_model::LessonRecord;

    #[test]
    fn metadata_issues_and_duplicate_ids_become_warnings() {
        let broken = syllabus_ingest::decode_lesson("x/lesson.md", "no front matter", &LoadOptions::default());
        let mut twin = LessonRecord::new(LessonId::parse("dup").unwrap(), "one/lesson.md");
        twin.title = "One".to_string();
        let mut other = twin.clone();
        other.source = "two/lesson.md".to_string();

        let corpus = LessonCorpus::new(
            "",
            vec![
                broken,
                LoadedLesson::from_record(twin),
                LoadedLesson::from_record(other),
            ],
        );
        let mut report = ReportBuilder::default();
        check_input_integrity(&corpus, &ConceptRegistry::default(), &mut report);
        let report = report.finish();

        assert_eq!(
            report.messages(Severity::Warning),
            vec![
                "Lesson 'x' (x/lesson.md): no front matter block",
                "Lesson id 'dup' is used by multiple files: one/lesson.md, two/lesson.md",
            ]
        );
        assert!(report.passed());
    }
}
