//! Combining the teacher's form with AI output into a lesson plan.

use super::model::{FormData, LessonPlan};
use crate::ai::GeneratedContent;

/// Build a plan from the form and a fresh AI response.
///
/// Identity, signature and core-fact fields always come from the form.
/// AI-authored fields come from the response, except learning objectives:
/// a non-blank value typed by the teacher is kept.
pub fn merge(form: &FormData, ai: GeneratedContent) -> LessonPlan {
    let learning_objectives = if form.learning_objectives.trim().is_empty() {
        ai.learning_objectives
    } else {
        form.learning_objectives.clone()
    };

    LessonPlan {
        school_name: form.school_name.clone(),
        teacher_name: form.teacher_name.clone(),
        subject: form.subject.clone(),
        phase_class: form.phase_class.clone(),
        time_allocation: form.time_allocation.clone(),
        school_year: form.school_year.clone(),

        subject_matter: form.subject_matter.clone(),
        specific_material: form.specific_material.clone(),
        learning_outcomes: form.learning_outcomes.clone(),

        student_profile: ai.student_profile,
        graduate_profile_dimensions: ai.graduate_profile_dimensions,
        cross_discipline: ai.cross_discipline,
        learning_objectives,
        learning_topic: ai.learning_topic,
        pedagogical_practices: ai.pedagogical_practices,
        learning_partnership: ai.learning_partnership,
        learning_environment: ai.learning_environment,
        digital_utilization: ai.digital_utilization,
        initial_activities: ai.initial_activities,
        core_activities: ai.core_activities,
        closing_activities: ai.closing_activities,
        initial_assessment: ai.initial_assessment,
        process_assessment: ai.process_assessment,
        final_assessment: ai.final_assessment,
        student_worksheet: ai.student_worksheet,

        signature_date: form.signature_date.clone(),
        principal_name: form.principal_name.clone(),
        principal_nip: form.principal_nip.clone(),
        teacher_nip: form.teacher_nip.clone(),
    }
}
