use std::sync::Arc;

use governor_engine::{
    AnalysisOrchestrator, AnalysisOutcome, AnalysisSettings, DIFF_HEADER, OutputChannel,
};

use crate::common::{Event, Fixture, Recorder, orchestrator};

const TWO_BREAKING: &str = r#"{"breaking_changes":[{"description":"removed GET /pets","client_impact":"404 for existing clients"},{"description":"required field added","client_impact":"requests rejected"}]}"#;

#[tokio::test]
async fn diff_passes_baseline_and_prints_raw_output() {
    // Echo the arguments so the request shape is visible in the channel.
    let fixture = Fixture::new("echo \"args: $*\"\n");
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let orch = orchestrator(&fixture, Recorder::new());

    let outcome = orch.diff(&doc, Some("v1/openapi.yaml".into())).await;

    let AnalysisOutcome::DiffReported { raw, .. } = outcome else {
        panic!("expected DiffReported, got {outcome:?}");
    };
    let expected = format!(
        "args: {} --policy standard --output-format json --baseline v1/openapi.yaml\n",
        doc.id().path().display()
    );
    assert_eq!(raw, expected);
    assert_eq!(
        orch.host().events(),
        [
            Event::Clear(OutputChannel::Diff),
            Event::Line(OutputChannel::Diff, DIFF_HEADER.into()),
            Event::Line(OutputChannel::Diff, String::new()),
            Event::Line(OutputChannel::Diff, expected),
            Event::Reveal(OutputChannel::Diff),
        ]
    );
}

#[tokio::test]
async fn breaking_changes_are_counted_but_not_committed() {
    let fixture = Fixture::printing(TWO_BREAKING);
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let orch = orchestrator(&fixture, Recorder::new());

    let outcome = orch.diff(&doc, Some("old.yaml".into())).await;

    assert!(matches!(
        outcome,
        AnalysisOutcome::DiffReported {
            breaking_changes: 2,
            ..
        }
    ));
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn picked_baseline_is_used_when_none_configured() {
    let fixture = Fixture::new("shift\nwhile [ \"$1\" != --baseline ]; do shift; done\necho \"$2\"\n");
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let orch = orchestrator(&fixture, Recorder::new().picking("picked.yaml"));

    let outcome = orch.diff(&doc, None).await;

    assert!(matches!(outcome, AnalysisOutcome::DiffReported { ref raw, .. } if raw == "picked.yaml\n"));
}

#[tokio::test]
async fn configured_baseline_wins_over_picker() {
    let fixture = Fixture::new("shift\nwhile [ \"$1\" != --baseline ]; do shift; done\necho \"$2\"\n");
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let orch = AnalysisOrchestrator::new(
        fixture.gateway(),
        Arc::new(Recorder::new().picking("picked.yaml")),
        AnalysisSettings {
            baseline: Some("configured.yaml".into()),
            ..AnalysisSettings::default()
        },
    );

    let outcome = orch.diff(&doc, None).await;

    assert!(matches!(outcome, AnalysisOutcome::DiffReported { ref raw, .. } if raw == "configured.yaml\n"));
}

#[tokio::test]
async fn dismissed_picker_cancels_without_spawning() {
    let fixture = Fixture::new("touch \"$0.ran\"\n");
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let orch = orchestrator(&fixture, Recorder::new());

    let outcome = orch.diff(&doc, None).await;

    assert!(matches!(outcome, AnalysisOutcome::Cancelled));
    assert!(orch.host().events().is_empty());
    assert!(!fixture.path("analyzer.sh.ran").exists());
}

#[tokio::test]
async fn diff_process_failure_uses_diff_prefix() {
    let fixture = Fixture::new("echo 'baseline not found' >&2\nexit 2\n");
    let doc = fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let orch = orchestrator(&fixture, Recorder::new());

    let outcome = orch.diff(&doc, Some("missing.yaml".into())).await;

    assert!(outcome.is_failure());
    assert_eq!(
        orch.host().events(),
        [Event::Error("API Governor diff error: baseline not found".into())]
    );
}
