#[cfg(test)]
mod test {

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use crate::http::CallResult;
    use crate::poll::{poll_until_terminal, PollCheck, PollSettings};

    fn fast_settings(max_attempts: u32) -> PollSettings {
        PollSettings {
            max_attempts,
            sleep_interval: Duration::from_millis(10),
        }
    }

    fn pending_result() -> CallResult {
        CallResult::new(200, "OK", r#"{"status":"processing"}"#)
    }

    fn done_result() -> CallResult {
        CallResult::new(200, "OK", r#"{"status":"done"}"#)
    }

    fn check_done(result: &CallResult) -> PollCheck {
        let status = result.json_str_field("status").unwrap_or_default();
        if status == "done" {
            PollCheck::Terminal
        } else {
            PollCheck::Pending
        }
    }

    #[tokio::test]
    async fn stops_on_the_attempt_that_turns_terminal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let result = poll_until_terminal(
            &fast_settings(5),
            &CancellationToken::new(),
            "status",
            move || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(if n >= 3 { done_result() } else { pending_result() })
                }
            },
            check_done,
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3, "no calls after the terminal one");
        assert_eq!(result.json_str_field("status").as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn exhaustion_returns_the_last_pending_result_unchanged() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let result = poll_until_terminal(
            &fast_settings(4),
            &CancellationToken::new(),
            "status",
            move || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(pending_result())
                }
            },
            check_done,
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4, "exactly the attempt budget");
        assert!(result.is_ok());
        assert_eq!(result.json_str_field("status").as_deref(), Some("processing"));
    }

    #[tokio::test]
    async fn job_id_mismatch_is_recoverable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let result = poll_until_terminal(
            &fast_settings(5),
            &CancellationToken::new(),
            "status",
            move || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(match n {
                        1 => CallResult::new(
                            200,
                            "OK",
                            r#"{"jobId":"other-job","status":"done"}"#,
                        ),
                        _ => CallResult::new(
                            200,
                            "OK",
                            r#"{"jobId":"my-job","status":"done"}"#,
                        ),
                    })
                }
            },
            |result| {
                let job_id = result.json_str_field("jobId").unwrap_or_default();
                if job_id != "my-job" {
                    PollCheck::JobIdMismatch {
                        expected: "my-job".into(),
                        received: job_id,
                    }
                } else {
                    check_done(result)
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2, "the mismatch did not end the loop");
        assert_eq!(result.json_str_field("jobId").as_deref(), Some("my-job"));
    }

    #[tokio::test]
    async fn exhausted_mismatches_surface_the_synthetic_result() {
        let result = poll_until_terminal(
            &fast_settings(3),
            &CancellationToken::new(),
            "status",
            || async {
                Ok(CallResult::new(
                    200,
                    "OK",
                    r#"{"jobId":"other-job"}"#,
                ))
            },
            |result| PollCheck::JobIdMismatch {
                expected: "my-job".into(),
                received: result.json_str_field("jobId").unwrap_or_default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.status_code(), crate::http::STATUS_JOB_ID_MISMATCH);
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn cancellation_aborts_the_sleep_and_returns_the_last_result() {
        let cancel = CancellationToken::new();
        let settings = PollSettings {
            max_attempts: 10,
            sleep_interval: Duration::from_secs(60),
        };

        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let started = tokio::time::Instant::now();
        let result = poll_until_terminal(
            &settings,
            &cancel,
            "status",
            move || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(pending_result())
                }
            },
            check_done,
        )
        .await
        .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5), "did not wait out the interval");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.json_str_field("status").as_deref(), Some("processing"));
    }
}
