//! Lesson plan records, the AI merge rule, form validation and persistence.

pub mod merge;
pub mod model;
pub mod persistence;
pub mod routes;
pub mod validation;

pub use merge::merge;
pub use model::{
    CoreFacts, FormData, LessonPlan, SectionKey, SectionValue, SectionValueMismatch,
    UnknownSectionKey, GRADUATE_PROFILE_DIMENSIONS,
};
pub use persistence::{PersistCommand, PlanStore};
pub use validation::{validate_form, ValidationError, ValidationErrors};
