//! Prompt text for the three AI actions.

use crate::lesson_plan::{CoreFacts, LessonPlan};

pub const GENERATE_TEMPERATURE: f32 = 0.7;
pub const REFINE_TEMPERATURE: f32 = 0.6;
pub const REGENERATE_TEMPERATURE: f32 = 0.8;

const NO_MARKDOWN: &str = "PENTING: Jangan gunakan format markdown seperti ** untuk tebal atau * atau - untuk daftar butir.";

fn optional_line(label: &str, value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!("- {}: {}\n", label, value.trim())
    }
}

pub fn generation_prompt(facts: &CoreFacts) -> String {
    let mut prompt = String::from(
        "Anda adalah asisten ahli dalam pembuatan Rencana Pelaksanaan Pembelajaran (RPP) untuk kurikulum di Indonesia, \
dengan spesialisasi pada pendekatan pembelajaran mendalam (deep learning).\n\
Berdasarkan informasi inti yang diberikan, hasilkan konten untuk setiap bagian RPP.\n\n\
Rancang pengalaman belajar yang mendorong pemahaman konseptual, penalaran kritis, dan aplikasi dunia nyata, bukan sekadar hafalan, \
terutama pada Kegiatan Inti dan Asesmen.\n\n\
SANGAT PENTING: Semua konten harus saling terkait dan relevan langsung dengan Materi Pelajaran, Capaian Pembelajaran, dan Tujuan Pembelajaran. \
Jika Materi Spesifik Tambahan disediakan, jadikan itu fokus utama kegiatan dan asesmen.\n\
PENTING: Jangan gunakan format markdown. Untuk daftar, gunakan format bernomor (1., 2., dst.) dan pisahkan setiap item dengan baris baru. \
Jangan gunakan ** untuk tebal atau * atau - untuk daftar butir.\n\n\
Informasi Inti RPP:\n",
    );
    prompt.push_str(&format!("- Mata Pelajaran: {}\n", facts.subject.trim()));
    prompt.push_str(&format!("- Fase/Kelas: {}\n", facts.phase_class.trim()));
    prompt.push_str(&format!("- Materi Pelajaran: {}\n", facts.subject_matter.trim()));
    prompt.push_str(&optional_line(
        "Materi Spesifik Tambahan (jadikan fokus utama)",
        &facts.specific_material,
    ));
    prompt.push_str(&format!("- Capaian Pembelajaran: {}\n", facts.learning_outcomes.trim()));
    prompt.push_str(&optional_line(
        "Tujuan Pembelajaran yang sudah ada (gunakan sebagai referensi)",
        &facts.learning_objectives,
    ));
    prompt.push_str(
        "\nHasilkan data untuk semua bidang dalam skema JSON yang disediakan. \
Jika Tujuan Pembelajaran tidak disediakan, buatlah berdasarkan Capaian Pembelajaran.",
    );
    prompt
}

pub fn refine_prompt(
    section_label: &str,
    current_text: &str,
    instruction: &str,
    plan: &LessonPlan,
) -> String {
    format!(
        "Anda adalah editor ahli untuk dokumen perencanaan pembelajaran yang berfokus pada pendekatan pembelajaran mendalam (deep learning).\n\
Tulis ulang teks bagian \"{label}\" sesuai permintaan pengguna. Hasil editan harus memperkuat pemahaman konseptual dan penalaran kritis \
serta tetap selaras dengan rencana pembelajaran secara keseluruhan.\n\n\
Konteks Rencana Pembelajaran:\n\
- Mata Pelajaran: {subject}\n\
- Materi Pelajaran: {matter}\n\
{specific}\
- Tujuan Pembelajaran: {objectives}\n\n\
Permintaan Pengguna: \"{instruction}\"\n\n\
Teks Asli untuk Ditulis Ulang:\n---\n{current}\n---\n\n\
Berikan HANYA teks yang telah ditulis ulang untuk bagian \"{label}\". Jangan menambahkan judul, pengantar, atau komentar lain.\n\
{no_markdown}",
        label = section_label,
        subject = plan.subject,
        matter = plan.subject_matter,
        specific = optional_line("Fokus Materi Spesifik", &plan.specific_material),
        objectives = plan.learning_objectives,
        instruction = instruction.trim(),
        current = current_text,
        no_markdown = NO_MARKDOWN,
    )
}

pub fn regenerate_prompt(section_label: &str, plan: &LessonPlan) -> String {
    format!(
        "Anda adalah penulis ahli untuk dokumen perencanaan pembelajaran dengan spesialisasi pendekatan pembelajaran mendalam (deep learning).\n\
Tulis ulang dari awal konten untuk bagian berjudul \"{label}\".\n\
Hasilkan versi baru yang segar dan kreatif yang menerapkan pemahaman konseptual, penalaran kritis, dan aplikasi nyata, \
dan tetap relevan dengan konteks rencana pembelajaran.\n\n\
Berikan HANYA teks baru untuk bagian \"{label}\". Jangan menambahkan judul, pengantar, atau komentar lain.\n\
{no_markdown}\n\n\
Konteks Rencana Pembelajaran:\n\
- Mata Pelajaran: {subject}\n\
- Materi Pelajaran: {matter}\n\
{specific}\
- Capaian Pembelajaran: {outcomes}\n\
- Tujuan Pembelajaran: {objectives}\n\
- Profil Siswa: {profile}\n",
        label = section_label,
        no_markdown = NO_MARKDOWN,
        subject = plan.subject,
        matter = plan.subject_matter,
        specific = optional_line("Fokus Materi Spesifik", &plan.specific_material),
        outcomes = plan.learning_outcomes,
        objectives = plan.learning_objectives,
        profile = plan.student_profile,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_skips_blank_optional_facts() {
        let facts = CoreFacts {
            subject: "IPAS".into(),
            subject_matter: "Siklus Air".into(),
            ..Default::default()
        };
        let prompt = generation_prompt(&facts);
        assert!(prompt.contains("- Mata Pelajaran: IPAS"));
        assert!(!prompt.contains("Materi Spesifik Tambahan (jadikan"));
        assert!(!prompt.contains("sudah ada"));
    }

    #[test]
    fn refine_prompt_quotes_label_and_text() {
        let plan = LessonPlan {
            specific_material: "Awan".into(),
            ..Default::default()
        };
        let prompt = refine_prompt("Kegiatan Inti", "1. Amati", "lebih singkat", &plan);
        assert!(prompt.contains("\"Kegiatan Inti\""));
        assert!(prompt.contains("---\n1. Amati\n---"));
        assert!(prompt.contains("- Fokus Materi Spesifik: Awan"));
    }
}
