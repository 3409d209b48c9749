//! Unit tests for the fallback dispatcher.

use std::time::Duration;

use mockall::{Sequence, mock};
use rstest::{fixture, rstest};

use super::{DispatchReport, FallbackDispatcher};
use crate::rewrite::backend::{AttemptOutcome, BackendError, RewriteBackend};
use crate::rewrite::candidate::{CandidateList, ModelCandidate};
use crate::rewrite::prompt::PromptPair;
use crate::rewrite::test_support::{RecordingBackoff, ScriptedBackend};
use crate::telemetry::test_support::RecordingTelemetrySink;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent};

mock! {
    pub Backend {}

    impl std::fmt::Debug for Backend {
        fn fmt<'a>(&self, f: &mut std::fmt::Formatter<'a>) -> std::fmt::Result;
    }

    impl RewriteBackend for Backend {
        fn complete<'a>(
            &self,
            candidate: &'a ModelCandidate,
            prompt: &'a PromptPair,
        ) -> Result<String, BackendError>;
    }
}

const DELAY: Duration = Duration::from_millis(250);

fn sample_prompt() -> PromptPair {
    PromptPair {
        system: "Rewrite in a formal tone.".to_owned(),
        user: "you are always late".to_owned(),
    }
}

#[fixture]
fn prompt() -> PromptPair {
    sample_prompt()
}

fn candidates(count: usize) -> CandidateList {
    CandidateList::new(
        (1..=count)
            .map(|index| ModelCandidate::new(format!("model-{index}")))
            .collect(),
    )
    .expect("candidate list should not be empty")
}

fn failure(kind: usize) -> BackendError {
    match kind % 4 {
        0 => BackendError::Timeout {
            message: "deadline elapsed".to_owned(),
        },
        1 => BackendError::Transport {
            message: "connection refused".to_owned(),
        },
        2 => BackendError::Status {
            status: 500,
            body: "internal error".to_owned(),
        },
        _ => BackendError::Malformed {
            message: "missing field `choices`".to_owned(),
        },
    }
}

fn run(backend: &ScriptedBackend, backoff: &RecordingBackoff, count: usize) -> DispatchReport {
    let telemetry = NoopTelemetrySink;
    FallbackDispatcher::new(backend, backoff, DELAY, &telemetry)
        .dispatch(&sample_prompt(), &candidates(count))
}

#[rstest]
#[case(1, 1)]
#[case(3, 1)]
#[case(3, 2)]
#[case(3, 3)]
#[case(5, 4)]
fn stops_at_first_success(#[case] total: usize, #[case] winner: usize) {
    let mut backend = ScriptedBackend::new();
    for index in 1..winner {
        backend = backend.fail(format!("model-{index}"), failure(index));
    }
    backend = backend.succeed(format!("model-{winner}"), "Rewritten");
    for index in (winner + 1)..=total {
        backend = backend.succeed(format!("model-{index}"), "Should not be used");
    }
    let backoff = RecordingBackoff::default();

    let report = run(&backend, &backoff, total);

    let expected_calls: Vec<String> = (1..=winner).map(|index| format!("model-{index}")).collect();
    assert_eq!(backend.calls(), expected_calls);
    assert_eq!(report.attempt_count(), winner);
    let chosen = report.winner().expect("a candidate should win");
    assert_eq!(chosen.candidate_id, format!("model-{winner}"));
    assert_eq!(chosen.text, "Rewritten");
    assert_eq!(backoff.pauses(), vec![DELAY; winner - 1]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn exhausts_every_candidate_when_all_fail(#[case] total: usize) {
    let mut backend = ScriptedBackend::new();
    for index in 1..=total {
        backend = backend.fail(format!("model-{index}"), failure(index));
    }
    let backoff = RecordingBackoff::default();

    let report = run(&backend, &backoff, total);

    assert_eq!(backend.calls().len(), total);
    assert_eq!(report.attempt_count(), total);
    assert!(report.winner().is_none());
    assert_eq!(backoff.pauses().len(), total - 1, "no pause after the last candidate");
}

#[rstest]
fn empty_text_is_not_accepted() {
    let backend = ScriptedBackend::new()
        .succeed("model-1", "   ")
        .succeed("model-2", "Nice try!");
    let backoff = RecordingBackoff::default();

    let report = run(&backend, &backoff, 2);

    let first = report.attempts().first().expect("first attempt recorded");
    assert_eq!(first.outcome, AttemptOutcome::EmptyText);
    assert_eq!(
        report.winner().map(|winner| winner.text.as_str()),
        Some("Nice try!")
    );
}

#[rstest]
fn every_failure_mode_is_contained(
    #[values(0, 1, 2, 3)] first_kind: usize,
    #[values(0, 1, 2, 3)] second_kind: usize,
) {
    let backend = ScriptedBackend::new()
        .fail("model-1", failure(first_kind))
        .fail("model-2", failure(second_kind));
    let backoff = RecordingBackoff::default();

    let report = run(&backend, &backoff, 2);

    assert!(report.winner().is_none());
    assert!(
        report
            .attempts()
            .iter()
            .all(|record| !matches!(record.outcome, AttemptOutcome::Text(_)))
    );
}

#[rstest]
fn unscripted_candidates_fail_without_aborting() {
    let backend = ScriptedBackend::new().succeed("model-3", "Recovered");
    let backoff = RecordingBackoff::default();

    let report = run(&backend, &backoff, 3);

    assert_eq!(report.attempt_count(), 3);
    assert_eq!(
        report.winner().map(|winner| winner.candidate_id.as_str()),
        Some("model-3")
    );
}

#[rstest]
fn failed_attempts_are_recorded_in_telemetry(prompt: PromptPair) {
    let backend = ScriptedBackend::new()
        .fail(
            "model-1",
            BackendError::Status {
                status: 429,
                body: "rate limited".to_owned(),
            },
        )
        .succeed("model-2", "Done");
    let backoff = RecordingBackoff::default();
    let telemetry = RecordingTelemetrySink::default();

    let report = FallbackDispatcher::new(&backend, &backoff, DELAY, &telemetry)
        .dispatch(&prompt, &candidates(2));

    assert!(report.winner().is_some(), "rate limits advance to the next candidate");
    let events = telemetry.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events.first(),
        Some(TelemetryEvent::AttemptFailed { candidate, attempt: 1, outcome, .. })
            if candidate == "model-1" && outcome == "rejected"
    ));
}

#[rstest]
fn candidates_are_called_in_declared_order(prompt: PromptPair) {
    let mut backend = MockBackend::new();
    let mut sequence = Sequence::new();
    backend
        .expect_complete()
        .withf(|candidate, _| candidate.id() == "model-1")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| {
            Err(BackendError::Status {
                status: 503,
                body: "unavailable".to_owned(),
            })
        });
    backend
        .expect_complete()
        .withf(|candidate, sent| candidate.id() == "model-2" && sent.user == "you are always late")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok("Please arrive on time.".to_owned()));
    let backoff = RecordingBackoff::default();
    let telemetry = NoopTelemetrySink;

    let report = FallbackDispatcher::new(&backend, &backoff, DELAY, &telemetry)
        .dispatch(&prompt, &candidates(3));

    assert_eq!(report.attempt_count(), 2);
    assert_eq!(
        report.winner().map(|winner| winner.text.as_str()),
        Some("Please arrive on time.")
    );
}
