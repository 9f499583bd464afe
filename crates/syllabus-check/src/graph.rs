//! Lesson dependency graph and cycle detection.
//!
//! Edges point from a lesson to what it depends on:
//! - `prereqs` entries (kept even when the target lesson does not exist),
//! - reused concepts, to the concept's registry-declared canonical lesson (never to itself).

use crate::report::{Finding, FindingCode, ReportBuilder};
use crate::CycleReporting;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use syllabus_model::{ConceptId, ConceptRegistry, LessonId, LessonRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeKind {
    Prereq,
    Reuse { concept: ConceptId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub to: LessonId,
    #[serde(flatten)]
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Corpus lessons, sorted, deduplicated.
    nodes: Vec<LessonId>,
    /// Outgoing edges per lesson, one per distinct target, first reason wins.
    adjacency: BTreeMap<LessonId, Vec<Edge>>,
}

impl DependencyGraph {
    pub fn build<'a>(
        lessons: impl IntoIterator<Item = &'a LessonRecord>,
        registry: &ConceptRegistry,
    ) -> Self {
        let mut graph = Self::default();
        for lesson in lessons {
            graph.nodes.push(lesson.id.clone());
            let edges = graph.adjacency.entry(lesson.id.clone()).or_default();

            for prereq in &lesson.prereqs {
                push_edge(edges, prereq.clone(), EdgeKind::Prereq);
            }
            for concept in &lesson.concepts_reused {
                let Some(owner) = registry.canonical_lesson(concept.as_str()) else {
                    continue;
                };
                if *owner == lesson.id {
                    continue;
                }
                push_edge(
                    edges,
                    owner.clone(),
                    EdgeKind::Reuse {
                        concept: concept.clone(),
                    },
                );
            }
        }
        graph.nodes.sort();
        graph.nodes.dedup();
        graph
    }

    pub fn nodes(&self) -> &[LessonId] {
        &self.nodes
    }

    pub fn edges(&self, from: &str) -> &[Edge] {
        self.adjacency.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Depth-first search from every node (in id order), recording the lesson path of each
    /// back-edge as `[re-entered, ..., re-entered]`.
    ///
    /// With [`CycleReporting::First`] the search stops at the first back-edge.
    pub fn find_cycles(&self, mode: CycleReporting) -> Vec<Vec<LessonId>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Temp,
            Perm,
        }

        let mut marks: HashMap<&LessonId, Mark> = HashMap::new();
        let mut cycles: Vec<Vec<LessonId>> = Vec::new();

        for start in &self.nodes {
            if marks.contains_key(start) {
                continue;
            }

            // (node, index of next edge to follow)
            let mut stack: Vec<(&LessonId, usize)> = vec![(start, 0)];
            marks.insert(start, Mark::Temp);

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(edge) = self.edges(node.as_str()).get(frame.1) else {
                    marks.insert(node, Mark::Perm);
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                let target = &edge.to;
                match marks.get(target) {
                    Some(Mark::Perm) => {}
                    Some(Mark::Temp) => {
                        let pos = stack
                            .iter()
                            .position(|(n, _)| *n == target)
                            .unwrap_or(0);
                        let mut path: Vec<LessonId> =
                            stack[pos..].iter().map(|(n, _)| (*n).clone()).collect();
                        path.push(target.clone());
                        cycles.push(path);
                        if mode == CycleReporting::First {
                            return cycles;
                        }
                    }
                    None => {
                        marks.insert(target, Mark::Temp);
                        stack.push((target, 0));
                    }
                }
            }
        }

        cycles
    }
}

fn push_edge(edges: &mut Vec<Edge>, to: LessonId, kind: EdgeKind) {
    if edges.iter().any(|e| e.to == to) {
        return;
    }
    edges.push(Edge { to, kind });
}

/// One warning per detected cycle.
pub fn check_cycles(graph: &DependencyGraph, mode: CycleReporting, report: &mut ReportBuilder) {
    let cycles = graph.find_cycles(mode);
    tracing::debug!(
        nodes = graph.nodes().len(),
        edges = graph.edge_count(),
        cycles = cycles.len(),
        "dependency graph checked"
    );

    for cycle in cycles {
        let rendered: Vec<&str> = cycle.iter().map(LessonId::as_str).collect();
        let message = format!("Dependency cycle detected: {}", rendered.join(" -> "));
        let mut finding = Finding::new(FindingCode::DependencyCycle, message);
        if let Some(first) = cycle.first() {
            finding = finding.with_lesson(first);
        }
        report.warning(finding.with_lessons(cycle));
    }
}
