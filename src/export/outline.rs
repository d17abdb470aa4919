//! The document structure shared by every renderer.
//!
//! Section presence, ordering and the list-or-paragraph decision are made
//! here once. Renderers walk [`Outline::blocks`] and never call the list
//! parser themselves.

use crate::lesson_plan::{LessonPlan, SectionKey};
use crate::text::{parse_section, ListItem, ParsedSection};

pub const TITLE: &str = "PERENCANAAN PEMBELAJARAN";
pub const SUBTITLE: &str = "(Pendekatan Pembelajaran Mendalam)";
pub const IDENTITY_HEADING: &str = "Identitas Umum Perencanaan";
pub const LEARNING_STEPS_NOTE: &str =
    "A. Langkah-langkah pembelajaran (Kegiatan pembelajaran berbasis mindful, meaningful, dan joyful)";

struct ChapterLayout {
    heading: &'static str,
    note: Option<&'static str>,
    sections: &'static [SectionKey],
}

const IDENTITY_ROWS: [SectionKey; 6] = [
    SectionKey::SchoolName,
    SectionKey::TeacherName,
    SectionKey::Subject,
    SectionKey::PhaseClass,
    SectionKey::TimeAllocation,
    SectionKey::SchoolYear,
];

const CHAPTERS: [ChapterLayout; 5] = [
    ChapterLayout {
        heading: "1. Identifikasi",
        note: None,
        sections: &[
            SectionKey::StudentProfile,
            SectionKey::SubjectMatter,
            SectionKey::SpecificMaterial,
            SectionKey::GraduateProfileDimensions,
        ],
    },
    ChapterLayout {
        heading: "2. Desain Pembelajaran",
        note: None,
        sections: &[
            SectionKey::LearningOutcomes,
            SectionKey::CrossDiscipline,
            SectionKey::LearningObjectives,
            SectionKey::LearningTopic,
            SectionKey::PedagogicalPractices,
            SectionKey::LearningPartnership,
            SectionKey::LearningEnvironment,
            SectionKey::DigitalUtilization,
        ],
    },
    ChapterLayout {
        heading: "3. Pengalaman Belajar",
        note: Some(LEARNING_STEPS_NOTE),
        sections: &[
            SectionKey::InitialActivities,
            SectionKey::CoreActivities,
            SectionKey::ClosingActivities,
        ],
    },
    ChapterLayout {
        heading: "4. Asesmen Pembelajaran: Pembelajaran",
        note: None,
        sections: &[
            SectionKey::InitialAssessment,
            SectionKey::ProcessAssessment,
            SectionKey::FinalAssessment,
        ],
    },
    ChapterLayout {
        heading: "5. Lampiran",
        note: None,
        sections: &[SectionKey::StudentWorksheet],
    },
];

/// One displayed section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBlock {
    pub key: SectionKey,
    pub label: &'static str,
    /// The stored text (dimension labels joined with ", ").
    pub raw: String,
    pub body: ParsedSection,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureColumn {
    pub lines_above: Vec<String>,
    pub name: String,
    pub nip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title {
        title: &'static str,
        subtitle: &'static str,
    },
    Chapter(&'static str),
    IdentityTable(Vec<(&'static str, String)>),
    Note(&'static str),
    Section(SectionBlock),
    Signatures {
        left: SignatureColumn,
        right: SignatureColumn,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub blocks: Vec<Block>,
}

impl Outline {
    pub fn sections(&self) -> impl Iterator<Item = &SectionBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Section(section) => Some(section),
            _ => None,
        })
    }

    pub fn section(&self, key: SectionKey) -> Option<&SectionBlock> {
        self.sections().find(|section| section.key == key)
    }
}

/// Text shown for a section, or `None` when the section is omitted.
pub fn display_text(plan: &LessonPlan, key: SectionKey) -> Option<String> {
    if plan.is_blank(key) {
        return None;
    }
    match plan.text(key) {
        Some(text) => Some(text.to_string()),
        None => Some(plan.graduate_profile_dimensions.join(", ")),
    }
}

fn section_block(plan: &LessonPlan, key: SectionKey) -> Option<SectionBlock> {
    let raw = display_text(plan, key)?;
    Some(SectionBlock {
        key,
        label: key.label(),
        body: parse_section(&raw),
        raw,
        editable: key.is_editable(),
    })
}

pub fn build_outline(plan: &LessonPlan) -> Outline {
    let mut blocks = vec![
        Block::Title {
            title: TITLE,
            subtitle: SUBTITLE,
        },
        Block::Chapter(IDENTITY_HEADING),
        Block::IdentityTable(
            IDENTITY_ROWS
                .iter()
                .map(|key| (key.label(), plan.text(*key).unwrap_or_default().to_string()))
                .collect(),
        ),
    ];

    for chapter in &CHAPTERS {
        blocks.push(Block::Chapter(chapter.heading));
        if let Some(note) = chapter.note {
            blocks.push(Block::Note(note));
        }
        blocks.extend(
            chapter
                .sections
                .iter()
                .filter_map(|key| section_block(plan, *key))
                .map(Block::Section),
        );
    }

    blocks.push(Block::Signatures {
        left: SignatureColumn {
            lines_above: vec!["Mengetahui,".to_string(), "Kepala Sekolah,".to_string()],
            name: plan.principal_name.clone(),
            nip: plan.principal_nip.clone(),
        },
        right: SignatureColumn {
            lines_above: vec![plan.signature_date.clone(), "Guru,".to_string()],
            name: plan.teacher_name.clone(),
            nip: plan.teacher_nip.clone(),
        },
    });

    Outline { blocks }
}

/// Number prefix for a list item. The sentinel carrying text before the
/// first marker gets none.
pub fn item_prefix(item: &ListItem) -> Option<String> {
    if item.is_sentinel() {
        None
    } else {
        Some(format!("{}. ", item.ordinal))
    }
}

pub fn nip_line(nip: &str) -> String {
    format!("NIP. {}", nip)
}
