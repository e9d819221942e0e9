//! Integration tests for a full suite run against a scripted runtime.
use std::time::Duration;

use smoke::mock::{ScriptedContainer, ScriptedRuntime};
use smoke::runtime::HarnessConfig;
use smoke::suite::{Check, Outcome, SLOW_SKIP_REASON, Suite};
use smoke_common::{ContainerName, ContainerStatus, SmokeError};

fn config() -> HarnessConfig {
    HarnessConfig::default().with_poll_interval(Duration::from_millis(10))
}

#[test_log::test(tokio::test(start_paused = true))]
async fn healthy_container_passes() {
    let runtime = ScriptedRuntime::new(
        ScriptedContainer::created_for(2, ContainerStatus::Running).with_logs("linux/amd64\n"),
    );

    let report = Suite::new(config()).run(&runtime).await.unwrap();

    assert!(report.is_success(), "{report}");
    assert_eq!(report.passed(), 2);
    assert_eq!(
        report.result(Check::PlatformReported).unwrap().outcome,
        Outcome::Skipped(SLOW_SKIP_REASON.to_string())
    );
    assert_eq!(runtime.runs(), 1);
    assert_eq!(runtime.removed(), vec!["main".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn slow_checks_run_when_asked() {
    let runtime = ScriptedRuntime::new(
        ScriptedContainer::new([ContainerStatus::Exited]).with_logs("linux/arm64\n"),
    );

    let report = Suite::new(config().with_run_slow(true))
        .run(&runtime)
        .await
        .unwrap();

    assert_eq!(report.passed(), 3);
    assert_eq!(report.skipped(), 0);
}

#[tokio::test(start_paused = true)]
async fn platform_check_alone_waits_for_exit() {
    let runtime = ScriptedRuntime::new(
        ScriptedContainer::new([ContainerStatus::Running]).with_logs("linux/amd64\n"),
    );

    let report = Suite::new(config().with_run_slow(true))
        .with_checks([Check::PlatformReported])
        .run(&runtime)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].outcome, Outcome::Passed);
}

#[tokio::test(start_paused = true)]
async fn platform_check_errors_when_exit_wait_fails() {
    let runtime = ScriptedRuntime::new(
        ScriptedContainer::new([ContainerStatus::Running])
            .with_logs("linux/amd64\n")
            .with_wait_error("daemon unreachable"),
    );

    let report = Suite::new(config().with_run_slow(true))
        .with_checks([Check::PlatformReported])
        .run(&runtime)
        .await
        .unwrap();

    assert!(matches!(report.results[0].outcome, Outcome::Errored(_)));
}

#[tokio::test(start_paused = true)]
async fn dirty_exit_fails_but_other_checks_still_run() {
    let runtime = ScriptedRuntime::new(
        ScriptedContainer::new([ContainerStatus::Running])
            .with_exit_code(1)
            .with_logs("Architecture: Unknown\n"),
    );

    let report = Suite::new(config().with_run_slow(true))
        .run(&runtime)
        .await
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(
        report.result(Check::ContainerRunning).unwrap().outcome,
        Outcome::Passed
    );
    assert_eq!(
        report.result(Check::CleanExit).unwrap().outcome,
        Outcome::Failed("The container did not exit cleanly (exit code 1)".to_string())
    );
    assert!(matches!(
        report.result(Check::PlatformReported).unwrap().outcome,
        Outcome::Failed(_)
    ));
    assert_eq!(runtime.removed().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn container_stuck_in_created_fails_the_start_check() {
    let runtime = ScriptedRuntime::new(ScriptedContainer::new([ContainerStatus::Created; 10]));

    let report = Suite::new(config())
        .with_checks([Check::ContainerRunning])
        .run(&runtime)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    match &report.results[0].outcome {
        Outcome::Failed(message) => {
            assert!(message.contains("`created` after 10 refreshes"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn runtime_errors_are_reported_per_check() {
    let runtime = ScriptedRuntime::new(
        ScriptedContainer::new([])
            .with_reload_error("daemon unreachable")
            .with_wait_error("daemon unreachable"),
    );

    let report = Suite::new(config()).run(&runtime).await.unwrap();

    assert_eq!(report.errored(), 2);
    assert!(!report.is_success());
    assert_eq!(runtime.removed().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn hung_container_times_out_when_bounded() {
    let runtime =
        ScriptedRuntime::new(ScriptedContainer::new([ContainerStatus::Running]).never_exits());

    let report = Suite::new(config().with_exit_timeout(Duration::from_secs(5)))
        .with_checks([Check::CleanExit])
        .run(&runtime)
        .await
        .unwrap();

    assert_eq!(
        report.results[0].outcome,
        Outcome::Errored("Container main did not exit within 5s".to_string())
    );
}

#[tokio::test]
async fn start_failure_is_a_run_error() {
    let runtime = ScriptedRuntime::failing_to_start("pull access denied");

    let result = Suite::new(config()).run(&runtime).await;

    assert!(matches!(result, Err(SmokeError::Runtime { .. })));
    assert!(runtime.removed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn custom_container_name_is_used_and_removed() {
    let runtime = ScriptedRuntime::new(ScriptedContainer::new([ContainerStatus::Exited]));
    let name = ContainerName::new("smoke-ci").unwrap();

    let report = Suite::new(config().with_container_name(name))
        .run(&runtime)
        .await
        .unwrap();

    assert_eq!(report.container_name.as_str(), "smoke-ci");
    assert_eq!(runtime.removed(), vec!["smoke-ci".to_string()]);
}
