use governor_engine::AnalysisOutcome;

use crate::common::{Fixture, MIXED_FINDINGS, Recorder, triggers};

#[tokio::test]
async fn activation_lints_only_governed_open_documents() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    let spec = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let readme = fixture.document("README.md", "openapi: mentioned in prose\n");
    let triggers = triggers(
        &fixture,
        Recorder::new().with_open(vec![spec.clone(), readme.clone()]),
        true,
    );

    for handle in triggers.activate() {
        handle.await.unwrap();
    }

    let registry = triggers.orchestrator().registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(spec.id()).len(), 2);
    assert!(!registry.contains(readme.id()));
}

#[tokio::test]
async fn save_relints_and_close_clears() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    let doc = fixture.document("swagger.json", "{\"swagger\": \"2.0\"}");
    let triggers = triggers(&fixture, Recorder::new(), true);

    let outcome = triggers.on_save(doc.clone()).unwrap().await.unwrap();
    assert!(matches!(outcome, AnalysisOutcome::Committed { .. }));
    assert!(triggers.orchestrator().registry().contains(doc.id()));

    triggers.on_close(doc.id());
    assert!(!triggers.orchestrator().registry().contains(doc.id()));
}

#[tokio::test]
async fn disabled_auto_lint_ignores_saves_but_not_opens() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let triggers = triggers(&fixture, Recorder::new(), false);

    assert!(triggers.on_save(doc.clone()).is_none());
    assert!(triggers.orchestrator().registry().is_empty());

    triggers.on_open(doc.clone()).await.unwrap();
    assert!(triggers.orchestrator().registry().contains(doc.id()));
}

#[tokio::test]
async fn lint_command_targets_active_document() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    let doc = fixture.document("api.openapi.yaml", "openapi: 3.0.0\n");
    let host = Recorder::new();
    host.set_active(doc.clone());
    let triggers = triggers(&fixture, host, true);

    let outcome = triggers.lint_command().await.unwrap();

    assert_eq!(outcome.document(), Some(doc.id()));
}

#[tokio::test]
async fn deactivate_drops_all_diagnostics() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    let a = fixture.document("a/openapi.yaml", "openapi: 3.0.0\n");
    let b = fixture.document("b/openapi.yaml", "openapi: 3.0.0\n");
    let triggers = triggers(&fixture, Recorder::new().with_open(vec![a, b]), true);
    for handle in triggers.activate() {
        handle.await.unwrap();
    }
    let registry = std::sync::Arc::clone(triggers.orchestrator().registry());
    assert_eq!(registry.len(), 2);

    triggers.deactivate();

    assert!(registry.is_empty());
}
