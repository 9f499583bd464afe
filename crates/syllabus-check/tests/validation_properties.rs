use std::fs;
use std::path::Path;

use proptest::prelude::*;
use syllabus_check::{
    validate, validate_paths, CheckOptions, CycleReporting, FindingCode, Severity,
};
use syllabus_ingest::{LessonCorpus, LoadOptions};
use syllabus_model::{Concept, ConceptId, ConceptRegistry, LessonId, LessonRecord};

// ============================================================================
// Fixtures
// ============================================================================

fn lid(s: &str) -> LessonId {
    LessonId::parse(s).unwrap()
}

fn cid(s: &str) -> ConceptId {
    ConceptId::parse(s).unwrap()
}

#[derive(Default)]
struct L {
    id: &'static str,
    prereqs: &'static [&'static str],
    introduced: &'static [&'static str],
    reused: &'static [&'static str],
    canonical: &'static [&'static str],
}

fn record(l: L) -> LessonRecord {
    let mut r = LessonRecord::new(lid(l.id), format!("{}/lesson.md", l.id));
    r.prereqs = l.prereqs.iter().map(|p| lid(p)).collect();
    r.concepts_introduced = l.introduced.iter().map(|c| cid(c)).collect();
    r.concepts_reused = l.reused.iter().map(|c| cid(c)).collect();
    r.canonical_for = l.canonical.iter().map(|c| cid(c)).collect();
    r
}

fn registry(entries: &[(&str, Option<&str>)]) -> ConceptRegistry {
    ConceptRegistry::new(entries.iter().map(|(id, canonical)| Concept {
        id: cid(id),
        canonical_lesson: canonical.map(lid),
    }))
}

fn run(lessons: Vec<L>, registry: &ConceptRegistry) -> syllabus_check::ValidationReport {
    let corpus = LessonCorpus::from_records(lessons.into_iter().map(record));
    validate(&corpus, registry, &CheckOptions::default())
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

// ============================================================================
// Error classes
// ============================================================================

#[test]
fn unknown_concept_is_one_error_from_any_list() {
    let reg = registry(&[]);
    let placements = [
        L {
            id: "intro",
            introduced: &["ghost"],
            ..Default::default()
        },
        L {
            id: "intro",
            reused: &["ghost"],
            ..Default::default()
        },
        L {
            id: "intro",
            canonical: &["ghost"],
            ..Default::default()
        },
        L {
            id: "intro",
            introduced: &["ghost"],
            reused: &["ghost"],
            canonical: &["ghost"],
            ..Default::default()
        },
    ];

    for lesson in placements {
        let report = run(vec![lesson], &reg);
        assert_eq!(report.errors.len(), 1, "{:?}", report.errors);
        let error = &report.errors[0];
        assert_eq!(error.code, FindingCode::UnknownConcept);
        assert!(error.message.contains("ghost"));
        assert!(error.message.contains("intro"));
        assert!(!report.passed());
    }
}

#[test]
fn two_owners_is_one_error_naming_both() {
    let reg = registry(&[("loops", None)]);
    let report = run(
        vec![
            L {
                id: "L1",
                introduced: &["loops"],
                ..Default::default()
            },
            L {
                id: "L2",
                introduced: &["loops"],
                ..Default::default()
            },
        ],
        &reg,
    );

    assert_eq!(
        report.messages(Severity::Error),
        vec!["Concept 'loops' has multiple canonical owners: L1, L2"]
    );
    assert_eq!(report.errors[0].lessons, vec![lid("L1"), lid("L2")]);
    assert!(!report.passed());
}

// ============================================================================
// Warnings and notes
// ============================================================================

#[test]
fn registry_owner_mismatch_is_only_a_warning() {
    let reg = registry(&[("loops", Some("L1"))]);
    let report = run(
        vec![L {
            id: "L2",
            introduced: &["loops"],
            ..Default::default()
        }],
        &reg,
    );

    assert!(report.passed());
    assert_eq!(
        report.messages(Severity::Warning),
        vec!["Concept 'loops': registry canonical 'L1' differs from lesson-declared owner 'L2'"]
    );
}

#[test]
fn prereq_cycle_is_one_warning_and_does_not_fail() {
    let report = run(
        vec![
            L {
                id: "A",
                prereqs: &["B"],
                ..Default::default()
            },
            L {
                id: "B",
                prereqs: &["C"],
                ..Default::default()
            },
            L {
                id: "C",
                prereqs: &["A"],
                ..Default::default()
            },
        ],
        &registry(&[]),
    );

    assert!(report.passed());
    assert_eq!(
        report.messages(Severity::Warning),
        vec!["Dependency cycle detected: A -> B -> C -> A"]
    );
}

#[test]
fn all_cycles_mode_reports_each_independent_cycle() {
    let corpus = LessonCorpus::from_records(
        [("a", "b"), ("b", "a"), ("x", "y"), ("y", "x")]
            .into_iter()
            .map(|(id, prereq)| {
                let mut r = LessonRecord::new(lid(id), format!("{id}/lesson.md"));
                r.prereqs = vec![lid(prereq)];
                r
            }),
    );
    let options = CheckOptions {
        cycle_reporting: CycleReporting::All,
    };
    let report = validate(&corpus, &registry(&[]), &options);
    assert_eq!(
        report.messages(Severity::Warning),
        vec![
            "Dependency cycle detected: a -> b -> a",
            "Dependency cycle detected: x -> y -> x",
        ]
    );
}

#[test]
fn coverage_findings_per_concept() {
    let reg = registry(&[
        ("unreused", Some("owner")),
        ("unowned", None),
        ("healthy", Some("owner")),
    ]);
    let report = run(
        vec![
            L {
                id: "owner",
                introduced: &["unreused", "healthy"],
                ..Default::default()
            },
            L {
                id: "user",
                reused: &["healthy"],
                ..Default::default()
            },
        ],
        &reg,
    );

    assert!(report.errors.is_empty());
    assert_eq!(
        report.messages(Severity::Warning),
        vec!["Coverage: concept 'unowned' has no canonical owner in lessons"]
    );
    assert_eq!(
        report.messages(Severity::Note),
        vec!["Coverage: concept 'unreused' (owner 'owner') is not reused in any lesson"]
    );
    assert!(report.iter().all(|(_, f)| f.concept != Some(cid("healthy"))));
}

// ============================================================================
// Whole runs over fixture corpora
// ============================================================================

fn fixture(root: &Path) {
    write(
        root,
        "curriculum.json",
        r#"{"concepts":[
            {"id":"loops","canonical_lesson":"loops-l1-for"},
            {"id":"vars"},
            {"id":"closures","canonical_lesson":"fns-l2-closures"}
        ]}"#,
    );
    write(
        root,
        "src/lessons/loops/l1-for/lesson.md",
        "---\ntitle: For loops\nconcepts_introduced: [loops]\nconcepts_reused: [vars]\n---\n",
    );
    write(
        root,
        "src/lessons/fns/l2-closures/lesson.md",
        "---\ntitle: Closures\nconcepts_introduced: [closures]\nconcepts_reused: [loops, ghost]\n---\n",
    );
    write(root, "src/lessons/misc/lesson.md", "no front matter\n");
}

#[test]
fn fixture_corpus_report_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    let lessons = dir.path().join("src/lessons");
    let registry = dir.path().join("curriculum.json");

    let first = validate_paths(&lessons, &registry, &LoadOptions::default(), &CheckOptions::default());
    let second = validate_paths(&lessons, &registry, &LoadOptions::default(), &CheckOptions::default());
    assert_eq!(first, second);

    assert_eq!(
        first.messages(Severity::Error),
        vec!["Unknown concept 'ghost' referenced in lesson 'fns-l2-closures'"]
    );
    assert_eq!(
        first.messages(Severity::Warning),
        vec![
            "Coverage: concept 'vars' has no canonical owner in lessons",
            "Lesson 'misc' (misc/lesson.md): no front matter block",
        ]
    );
    assert_eq!(
        first.messages(Severity::Note),
        vec!["Coverage: concept 'closures' (owner 'fns-l2-closures') is not reused in any lesson"]
    );
}

#[test]
fn missing_registry_short_circuits() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    let report = validate_paths(
        &dir.path().join("src/lessons"),
        &dir.path().join("absent.json"),
        &LoadOptions::default(),
        &CheckOptions::default(),
    );

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, FindingCode::RegistryMissing);
    assert!(report.errors[0].message.starts_with("Missing concept registry at "));
    assert!(report.warnings.is_empty());
    assert!(report.notes.is_empty());
    assert!(!report.passed());
}

#[test]
fn unreadable_registry_and_missing_lessons_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.json", "{ not json");
    let report = validate_paths(
        dir.path(),
        &dir.path().join("broken.json"),
        &LoadOptions::default(),
        &CheckOptions::default(),
    );
    assert_eq!(report.summary().error_count, 1);
    assert_eq!(report.errors[0].code, FindingCode::RegistryUnreadable);

    write(dir.path(), "curriculum.json", r#"{"concepts":[]}"#);
    let report = validate_paths(
        &dir.path().join("no-lessons"),
        &dir.path().join("curriculum.json"),
        &LoadOptions::default(),
        &CheckOptions::default(),
    );
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, FindingCode::LessonsMissing);
    assert!(report.warnings.is_empty() && report.notes.is_empty());
}

#[test]
fn blank_registry_canonical_is_treated_as_undeclared() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "curriculum.json",
        r#"{"concepts":[{"id":"loops","canonical_lesson":""},{"id":"vars"}]}"#,
    );
    write(
        dir.path(),
        "lessons/loops/lesson.md",
        "---\ntitle: Loops\nconcepts_introduced: [loops]\nconcepts_reused: [vars, ghost]\n---\n",
    );

    let report = validate_paths(
        &dir.path().join("lessons"),
        &dir.path().join("curriculum.json"),
        &LoadOptions::default(),
        &CheckOptions::default(),
    );

    assert_eq!(
        report.messages(Severity::Error),
        vec!["Unknown concept 'ghost' referenced in lesson 'loops'"]
    );
    assert!(report.iter().all(|(_, f)| f.code != FindingCode::RegistryUnreadable));
    assert!(report
        .warnings
        .iter()
        .all(|f| f.code != FindingCode::RegistryOwnerMismatch));
}

#[test]
fn numeric_lesson_ids_link_prereqs_and_owners() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "curriculum.json",
        r#"{"concepts":[{"id":"loops","canonical_lesson":"42"}]}"#,
    );
    write(
        dir.path(),
        "lessons/a/lesson.md",
        "---\nid: 42\ntitle: Loops\nconcepts_introduced: [loops]\n---\n",
    );
    write(
        dir.path(),
        "lessons/b/lesson.md",
        "---\nid: 43\ntitle: More loops\nprereqs: [42]\nconcepts_reused: [loops]\n---\n",
    );

    let report = validate_paths(
        &dir.path().join("lessons"),
        &dir.path().join("curriculum.json"),
        &LoadOptions::default(),
        &CheckOptions::default(),
    );

    assert!(report.passed(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert!(report.notes.is_empty(), "{:?}", report.notes);
}

#[test]
fn loader_warnings_follow_graph_and_coverage_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "curriculum.json",
        r#"{"concepts":[{"id":"vars"},{"id":"vars"}]}"#,
    );
    write(dir.path(), "lessons/a/lesson.md", "---\nprereqs: [b]\n---\n");
    write(dir.path(), "lessons/b/lesson.md", "---\nprereqs: [a]\n---\n");
    write(dir.path(), "lessons/c/lesson.md", "---\nlevel: [oops\n---\n");

    let report = validate_paths(
        &dir.path().join("lessons"),
        &dir.path().join("curriculum.json"),
        &LoadOptions::default(),
        &CheckOptions::default(),
    );

    let codes: Vec<FindingCode> = report.warnings.iter().map(|f| f.code).collect();
    assert_eq!(
        codes,
        vec![
            FindingCode::DependencyCycle,
            FindingCode::UncoveredConcept,
            FindingCode::MalformedMetadata,
            FindingCode::DuplicateConcept,
        ]
    );
}

// ============================================================================
// Properties
// ============================================================================

const LESSON_POOL: &[&str] = &["a", "b", "c", "d", "e"];
const CONCEPT_POOL: &[&str] = &["loops", "vars", "ghost", "closures"];

fn arb_lesson() -> impl Strategy<Value = LessonRecord> {
    (
        prop::sample::select(LESSON_POOL),
        prop::collection::vec(prop::sample::select(LESSON_POOL), 0..3),
        prop::collection::vec(prop::sample::select(CONCEPT_POOL), 0..3),
        prop::collection::vec(prop::sample::select(CONCEPT_POOL), 0..3),
    )
        .prop_map(|(id, prereqs, introduced, reused)| {
            let mut r = LessonRecord::new(lid(id), format!("{id}/lesson.md"));
            r.prereqs = prereqs.into_iter().map(lid).collect();
            r.concepts_introduced = introduced.into_iter().map(cid).collect();
            r.concepts_reused = reused.into_iter().map(cid).collect();
            r
        })
}

proptest! {
    #[test]
    fn verdict_tracks_errors_and_runs_are_deterministic(
        lessons in prop::collection::vec(arb_lesson(), 0..6),
    ) {
        let reg = registry(&[("loops", Some("a")), ("vars", None), ("closures", Some("c"))]);
        let corpus = LessonCorpus::from_records(lessons);

        let first = validate(&corpus, &reg, &CheckOptions::default());
        let second = validate(&corpus, &reg, &CheckOptions::default());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.passed(), first.errors.is_empty());

        let error_codes_ok = first
            .errors
            .iter()
            .all(|f| matches!(f.code, FindingCode::UnknownConcept | FindingCode::MultipleOwners));
        prop_assert!(error_codes_ok);

        let cycles = first
            .warnings
            .iter()
            .filter(|f| f.code == FindingCode::DependencyCycle)
            .count();
        prop_assert!(cycles <= 1);
    }
}
