//! Syllabus curriculum model
//!
//! Typed vocabulary shared by the loader, the consistency checks and the CLI:
//!
//! - [`LessonId`] / [`ConceptId`]: canonicalized identifier newtypes,
//! - [`LessonRecord`]: one parsed lesson (ownership claims, reuse, prereqs, catalog metadata),
//! - [`ConceptRegistry`]: the central list of known concepts and their declared owners,
//! - [`LessonOrder`]: the dotted `major.minor.patch` ordering token.
//!
//! Nothing in this crate touches the file system; loading lives in `syllabus-ingest`.

pub mod id;
pub mod lesson;
pub mod order;
pub mod registry;

pub use id::{ConceptId, IdError, LessonId};
pub use lesson::{
    compare_lessons, Crosslink, LessonCheck, LessonExtras, LessonRecord, LessonStatus,
};
pub use order::{LessonOrder, OrderParseError};
pub use registry::{Concept, ConceptRegistry, RegistryDocument};
