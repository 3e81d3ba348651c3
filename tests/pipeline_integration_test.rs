//! Pipeline runner behaviour against the mock substrate.

mod common;

use std::sync::Arc;

use akatsuki::adapters::substrates::{MockResponse, MockSubstrate};
use akatsuki::domain::errors::DomainError;
use akatsuki::domain::models::{Pipeline, Stage, FIX_MISSION_MARKER};
use akatsuki::services::{dev_pipeline, full_pipeline, run_pipeline, PipelineRunner};

use common::{agent, RecordingHooks};

#[tokio::test]
async fn test_dev_pipeline_records_every_invocation_in_order() {
    common::setup_test_logging();
    let substrate = Arc::new(MockSubstrate::new());

    let result = run_pipeline(substrate.clone(), &dev_pipeline(""), "add signup form")
        .await
        .unwrap();

    let names: Vec<&str> = result.outputs.iter().map(|o| o.agent_name.as_str()).collect();
    assert_eq!(names, vec!["Kisame", "Sasori", "Itachi", "Hidan", "Kisame"]);
    assert_eq!(result.output.matches("## ").count(), 5);
    assert_eq!(result.output.matches("\n\n---\n\n").count(), 4);
    assert_eq!(result.usage.requests, 5);
    assert_eq!(result.usage.agent("Kisame").unwrap().requests, 2);
}

#[tokio::test]
async fn test_parallel_members_receive_identical_messages() {
    let substrate = Arc::new(MockSubstrate::new());
    run_pipeline(substrate.clone(), &dev_pipeline("Stack: Rust."), "t").await.unwrap();

    let sasori = substrate.messages_for("Sasori").await;
    let itachi = substrate.messages_for("Itachi").await;
    let hidan = substrate.messages_for("Hidan").await;
    assert_eq!(sasori, itachi);
    assert_eq!(itachi, hidan);
    assert!(sasori[0].starts_with("Project context:\nStack: Rust.\n\nTask: t"));
    assert!(sasori[0].contains("### Kisame\nKisame completed the task."));
}

#[tokio::test]
async fn test_parallel_output_order_follows_declaration_not_completion() {
    let substrate = Arc::new(MockSubstrate::new());
    substrate
        .set_response_for_agent("A", MockResponse::success("slow").with_delay(80))
        .await;
    substrate
        .set_response_for_agent("B", MockResponse::success("fast").with_delay(5))
        .await;

    let pipeline = Pipeline::new(vec![Stage::new(vec![agent("A"), agent("B")])]);
    let result = run_pipeline(substrate.clone(), &pipeline, "t").await.unwrap();

    assert_eq!(result.outputs[0].output, "slow");
    assert_eq!(result.outputs[1].output, "fast");
}

#[tokio::test]
async fn test_stage_members_run_concurrently() {
    let substrate = Arc::new(MockSubstrate::with_default_response(
        MockResponse::default().with_delay(50),
    ));
    let pipeline = Pipeline::new(vec![
        Stage::new(vec![agent("Lead")]),
        Stage::new(vec![agent("R1"), agent("R2"), agent("R3")]),
    ]);

    run_pipeline(substrate.clone(), &pipeline, "t").await.unwrap();
    assert_eq!(substrate.peak_concurrency(), 3);
}

#[tokio::test]
async fn test_failure_aborts_remaining_stages() {
    let substrate = Arc::new(MockSubstrate::new());
    substrate
        .set_response_for_agent("Itachi", MockResponse::failure("rate limited"))
        .await;

    let err = run_pipeline(substrate.clone(), &dev_pipeline(""), "t").await.unwrap_err();
    match err {
        DomainError::Invocation { agent, message } => {
            assert_eq!(agent, "Itachi");
            assert!(message.contains("rate limited"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // the fix stage never ran
    assert_eq!(substrate.messages_for("Kisame").await.len(), 1);
}

#[tokio::test]
async fn test_only_fix_stages_carry_the_fix_mission() {
    let substrate = Arc::new(MockSubstrate::new());
    run_pipeline(substrate.clone(), &full_pipeline(""), "t").await.unwrap();

    for invocation in substrate.invocations().await {
        let is_fix = invocation.message.contains(FIX_MISSION_MARKER);
        let kisame_second = invocation.agent == "Kisame"
            && invocation.message.contains("### Hidan");
        assert_eq!(is_fix, kisame_second, "unexpected fix marker for {}", invocation.agent);
    }
    // the docs stage sees the fix output
    let konan = substrate.messages_for("Konan").await;
    assert_eq!(konan[0].matches("### Kisame").count(), 2);
}

#[tokio::test]
async fn test_empty_pipeline_is_rejected() {
    let substrate = Arc::new(MockSubstrate::new());
    let err = run_pipeline(substrate.clone(), &Pipeline::new(vec![]), "t").await.unwrap_err();
    assert!(matches!(err, DomainError::EmptyPipeline));
    assert!(substrate.invocations().await.is_empty());
}

#[tokio::test]
async fn test_runner_reports_stage_events() {
    let substrate = Arc::new(MockSubstrate::new());
    let hooks = Arc::new(RecordingHooks::default());
    let runner = PipelineRunner::new(substrate).with_hooks(hooks.clone());

    runner.run(&dev_pipeline(""), "t").await.unwrap();

    let stages: Vec<String> = hooks
        .events()
        .into_iter()
        .filter(|e| e.starts_with("stage"))
        .collect();
    assert_eq!(
        stages,
        vec![
            "stage implement 1",
            "stage-end implement",
            "stage review 3",
            "stage-end review",
            "stage fix 1",
            "stage-end fix",
        ]
    );
}

#[tokio::test]
async fn test_usage_sums_over_agents() {
    let substrate = Arc::new(MockSubstrate::new());
    substrate
        .set_response_for_agent("X", MockResponse::success("x").with_usage(1000, 500, 2))
        .await;
    substrate
        .set_response_for_agent("Y", MockResponse::success("y").with_usage(800, 300, 1))
        .await;

    let pipeline = Pipeline::new(vec![Stage::new(vec![agent("X"), agent("Y")])]);
    let result = run_pipeline(substrate, &pipeline, "t").await.unwrap();

    assert_eq!(result.usage.total_tokens(), 2600);
    assert_eq!(result.usage.requests, 3);
    assert_eq!(result.usage.by_agent.len(), 2);
}
