mod common;

use common::{sample_form, start_service, wait_for_key, MockGenerator};
use rpp_generator::export::{ExportFormat, ThemeColor};
use rpp_generator::lesson_plan::persistence::{FORM_KEY, PLAN_KEY};
use rpp_generator::lesson_plan::{FormData, SectionKey, SectionValue};
use rpp_generator::storage::MemoryStore;
use rpp_generator::text::ParsedSection;
use rpp_generator::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[tokio::test]
async fn test_generate_merges_form_and_ai_content() {
    let generator = Arc::new(MockGenerator::new());
    let service = start_service(generator.clone(), MemoryStore::new()).await;

    let plan = service.generate(sample_form()).await.unwrap();
    assert_eq!(plan.school_name, "SD Negeri 1 Cakung");
    assert_eq!(plan.subject_matter, "Siklus Air");
    assert_eq!(
        plan.learning_objectives,
        "1. Menjelaskan penguapan.\n2. Menjelaskan kondensasi."
    );
    assert_eq!(service.current_plan().unwrap(), plan);

    let kept = service
        .generate(FormData {
            learning_objectives: "Tujuan dari guru".to_string(),
            ..sample_form()
        })
        .await
        .unwrap();
    assert_eq!(kept.learning_objectives, "Tujuan dari guru");
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_generate_rejects_incomplete_form_without_calling_ai() {
    let generator = Arc::new(MockGenerator::new());
    let service = start_service(generator.clone(), MemoryStore::new()).await;

    let result = service
        .generate(FormData {
            school_name: "  ".to_string(),
            ..sample_form()
        })
        .await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));
    assert_eq!(generator.calls(), 0);
    assert!(matches!(service.current_plan(), Err(ServiceError::NoPlan)));
}

#[tokio::test]
async fn test_failed_generation_keeps_previous_plan() {
    let generator = Arc::new(MockGenerator::new());
    let service = start_service(generator.clone(), MemoryStore::new()).await;
    let before = service.generate(sample_form()).await.unwrap();

    generator.set_failing(true);
    let err = service.generate(sample_form()).await.unwrap_err();
    assert_eq!(err.to_string(), "Gagal menghasilkan konten RPP dari AI.");
    assert_eq!(service.current_plan().unwrap(), before);
}

#[tokio::test]
async fn test_failed_refine_leaves_section_untouched() {
    let generator = Arc::new(MockGenerator::new());
    let service = start_service(generator.clone(), MemoryStore::new()).await;
    let before = service.generate(sample_form()).await.unwrap();

    generator.set_failing(true);
    let err = service
        .refine(SectionKey::CoreActivities, "Tambahkan permainan")
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Ai { .. }));
    assert_eq!(
        err.to_string(),
        "Gagal menyempurnakan bagian \"Kegiatan Inti\"."
    );
    assert_eq!(
        service.current_plan().unwrap().core_activities,
        before.core_activities
    );
    assert!(service.active_sections().is_empty());
}

#[tokio::test]
async fn test_refine_and_regenerate_replace_only_their_section() {
    let service = start_service(Arc::new(MockGenerator::new()), MemoryStore::new()).await;
    let before = service.generate(sample_form()).await.unwrap();

    let refined = service
        .refine(SectionKey::ClosingActivities, "Tambahkan kuis")
        .await
        .unwrap();
    assert_eq!(refined.closing_activities, "1. Tambahkan kuis\n2. Langkah tambahan");
    assert_eq!(refined.core_activities, before.core_activities);

    let regenerated = service.regenerate(SectionKey::InitialActivities).await.unwrap();
    assert!(regenerated.initial_activities.starts_with("1. Langkah baru"));
    assert_eq!(regenerated.closing_activities, refined.closing_activities);
}

#[tokio::test]
async fn test_ai_rejects_non_editable_sections_and_blank_instructions() {
    let generator = Arc::new(MockGenerator::new());
    let service = start_service(generator.clone(), MemoryStore::new()).await;
    service.generate(sample_form()).await.unwrap();

    assert!(matches!(
        service.regenerate(SectionKey::SchoolName).await,
        Err(ServiceError::NotEditable(_))
    ));
    assert!(matches!(
        service.refine(SectionKey::CoreActivities, "   ").await,
        Err(ServiceError::Validation(_))
    ));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_one_ai_call_per_section() {
    let gate = Arc::new(Notify::new());
    let generator = Arc::new(MockGenerator::gated(gate.clone()));
    let service = Arc::new(start_service(generator.clone(), MemoryStore::new()).await);
    service.generate(sample_form()).await.unwrap();

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.regenerate(SectionKey::CoreActivities).await })
    };

    for _ in 0..200 {
        if !service.active_sections().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(service.active_sections(), vec![SectionKey::CoreActivities]);

    let busy = service
        .refine(SectionKey::CoreActivities, "Lebih singkat")
        .await;
    assert!(matches!(busy, Err(ServiceError::SectionBusy(_))));

    // Releases the waiting call and leaves a permit for the next one.
    gate.notify_one();
    gate.notify_one();

    // A different section is not blocked.
    let other = service.regenerate(SectionKey::ClosingActivities).await;
    assert!(other.is_ok());

    let plan = first.await.unwrap().unwrap();
    assert!(plan.core_activities.starts_with("1. Langkah baru"));
    assert!(service.active_sections().is_empty());
}

#[tokio::test]
async fn test_update_section_checks_value_shape() {
    let service = start_service(Arc::new(MockGenerator::new()), MemoryStore::new()).await;
    assert!(matches!(
        service
            .update_section(SectionKey::LearningTopic, SectionValue::Text("x".to_string()))
            .await,
        Err(ServiceError::NoPlan)
    ));

    service.generate(sample_form()).await.unwrap();
    let plan = service
        .update_section(
            SectionKey::GraduateProfileDimensions,
            SectionValue::Labels(vec!["Kreativitas".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(plan.graduate_profile_dimensions, vec!["Kreativitas"]);

    let mismatch = service
        .update_section(
            SectionKey::LearningTopic,
            SectionValue::Labels(vec!["a".to_string()]),
        )
        .await;
    assert!(matches!(mismatch, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn test_parsed_section_and_preview_follow_the_plan() {
    let service = start_service(Arc::new(MockGenerator::new()), MemoryStore::new()).await;
    service.generate(sample_form()).await.unwrap();

    match service.parsed_section(SectionKey::ProcessAssessment).unwrap() {
        ParsedSection::List(items) => assert_eq!(items.len(), 2),
        other => panic!("expected list, got {:?}", other),
    }
    assert_eq!(
        service.parsed_section(SectionKey::FinalAssessment).unwrap(),
        ParsedSection::Paragraph(String::new())
    );

    let theme = ThemeColor::parse("#004d40").unwrap();
    let html = service.preview(&theme).unwrap();
    assert!(html.contains("background-color: #004d40;"));
    assert!(html.contains("<textarea name=\"coreActivities\""));
    assert!(!html.contains("data-key=\"finalAssessment\""));
}

#[tokio::test]
async fn test_docx_and_html_export_without_external_tools() {
    let service = start_service(Arc::new(MockGenerator::new()), MemoryStore::new()).await;
    assert!(matches!(
        service.export(ExportFormat::Docx, ThemeColor::default()).await,
        Err(ServiceError::NoPlan)
    ));
    service.generate(sample_form()).await.unwrap();

    let docx = service
        .export(ExportFormat::Docx, ThemeColor::default())
        .await
        .unwrap();
    assert_eq!(docx.filename, "Perencanaan_Pembelajaran.docx");
    assert_eq!(
        docx.content_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(&docx.bytes[..2], b"PK");

    let html = service
        .export(ExportFormat::Html, ThemeColor::default())
        .await
        .unwrap();
    assert_eq!(html.content_type, "text/html");
    assert!(String::from_utf8(html.bytes).unwrap().contains("Siklus Air"));
    assert!(service.active_exports().is_empty());
}

#[tokio::test]
async fn test_pdf_export_reports_missing_typst() {
    let service = start_service(Arc::new(MockGenerator::new()), MemoryStore::new()).await;
    service.generate(sample_form()).await.unwrap();

    let err = service
        .export(ExportFormat::Pdf, ThemeColor::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Export {
            format: ExportFormat::Pdf,
            ..
        }
    ));
    assert!(service.active_exports().is_empty());
}

#[tokio::test]
async fn test_state_survives_restart_and_reset_clears_it() {
    let memory = MemoryStore::new();
    {
        let service = start_service(Arc::new(MockGenerator::new()), memory.clone()).await;
        service.generate(sample_form()).await.unwrap();
    }
    wait_for_key(&memory, PLAN_KEY, true).await;
    wait_for_key(&memory, FORM_KEY, true).await;

    let restored = start_service(Arc::new(MockGenerator::new()), memory.clone()).await;
    assert_eq!(restored.current_plan().unwrap().subject, "IPAS");
    assert_eq!(restored.form_data(), sample_form());

    restored.reset().await;
    assert!(matches!(restored.current_plan(), Err(ServiceError::NoPlan)));
    assert_eq!(restored.form_data(), FormData::default());
    wait_for_key(&memory, PLAN_KEY, false).await;
    wait_for_key(&memory, FORM_KEY, false).await;
}
