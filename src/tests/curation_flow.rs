#[cfg(test)]
mod test {

    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::Path;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use http::StatusCode;
    use serde_json::{json, Value};
    use tokio::task::JoinHandle;

    use crate::family::ServiceFamily;
    use crate::http::STATUS_JOB_ID_MISMATCH;
    use crate::services::{ContentToProcess, DataCurationService};
    use crate::tests::common::{stub_core, token_response};

    struct CurationStub {
        handle: JoinHandle<()>,
        addr: SocketAddr,
        presign_options: Arc<std::sync::Mutex<Option<Value>>>,
        upload_calls: Arc<AtomicUsize>,
        status_calls: Arc<AtomicUsize>,
    }

    /// Curation backend whose status endpoint answers, in order: a payload
    /// for the wrong job, "processing" and then "Done".
    async fn spawn_curation_stub() -> CurationStub {
        crate::tests::common::init_tracing();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().unwrap();

        let presign_options = Arc::new(std::sync::Mutex::new(None));
        let upload_calls = Arc::new(AtomicUsize::new(0));
        let status_calls = Arc::new(AtomicUsize::new(0));

        let presign_options_clone = presign_options.clone();
        let upload_calls_clone = upload_calls.clone();
        let status_calls_clone = status_calls.clone();

        let router = Router::new()
            .route(
                "/connect/token",
                post(|| async { Json(token_response("stub-token", 3600)) }),
            )
            .route(
                "/api/presign",
                post(move |body: String| {
                    let captured = presign_options_clone.clone();
                    async move {
                        *captured.lock().unwrap() = serde_json::from_str(&body).ok();
                        Json(json!({
                            "job_id": "job-7",
                            "put_url": format!("http://{addr}/bucket/job-7"),
                            "get_url": format!("http://{addr}/bucket/job-7/curated"),
                        }))
                    }
                }),
            )
            .route(
                "/bucket/{job}",
                put(move |Path(_job): Path<String>, _body: axum::body::Bytes| {
                    let calls = upload_calls_clone.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        StatusCode::OK
                    }
                }),
            )
            .route(
                "/api/status/{job}",
                get(move |Path(job): Path<String>| {
                    let calls = status_calls_clone.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                        match n {
                            1 => Json(json!({"jobId": "someone-elses-job", "status": "Done"})),
                            2 => Json(json!({"jobId": job, "status": "processing"})),
                            _ => Json(json!({"jobId": job, "status": "Done"})),
                        }
                    }
                }),
            )
            .route(
                "/bucket/{job}/curated",
                get(|Path(_job): Path<String>| async {
                    Json(json!({"chunks": [{"text": "curated text"}]}))
                }),
            );

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server failed");
        });

        CurationStub {
            handle,
            addr,
            presign_options,
            upload_calls,
            status_calls,
        }
    }

    #[tokio::test]
    async fn curate_runs_presign_upload_poll_and_final_fetch() {
        let stub = spawn_curation_stub().await;
        let core = stub_core(ServiceFamily::DataCuration, stub.addr).await;
        let service = DataCurationService::new(core);

        let content =
            ContentToProcess::from_bytes(Some("doc-1".into()), b"raw document".to_vec(), "text/plain");
        let result = service.curate("", &content, None).await.unwrap();

        assert!(result.is_ok());
        let body = result.json().unwrap();
        assert_eq!(body["chunks"][0]["text"], "curated text");

        // Default options went out on the presign call.
        let options = stub.presign_options.lock().unwrap().clone().unwrap();
        assert_eq!(options["chunking"], true);
        assert_eq!(options["json_schema"], "PIPELINE");

        assert_eq!(stub.upload_calls.load(Ordering::SeqCst), 1);
        // Wrong-job payload, "processing", then "Done".
        assert_eq!(stub.status_calls.load(Ordering::SeqCst), 3);

        stub.handle.abort();
    }

    #[tokio::test]
    async fn caller_options_replace_the_defaults() {
        let stub = spawn_curation_stub().await;
        let core = stub_core(ServiceFamily::DataCuration, stub.addr).await;
        let service = DataCurationService::new(core);

        let content = ContentToProcess::from_bytes(Some("doc-1".into()), b"raw".to_vec(), "text/plain");
        let options = r#"{"chunking": false, "embedding": false}"#;
        service.curate("", &content, Some(options)).await.unwrap();

        let seen = stub.presign_options.lock().unwrap().clone().unwrap();
        assert_eq!(seen["chunking"], false);
        assert!(seen.get("json_schema").is_none());

        stub.handle.abort();
    }

    #[tokio::test]
    async fn exhausted_mismatch_polling_reports_the_mismatch() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new()
            .route(
                "/connect/token",
                post(|| async { Json(token_response("stub-token", 3600)) }),
            )
            .route(
                "/api/status/{job}",
                get(|Path(_job): Path<String>| async {
                    Json(json!({"jobId": "someone-elses-job", "status": "Done"}))
                }),
            );
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server failed");
        });

        let core = stub_core(ServiceFamily::DataCuration, addr).await;
        let service = DataCurationService::new(core);

        let status = service.pull_status("", "job-7").await.unwrap();
        assert_eq!(status.status_code(), STATUS_JOB_ID_MISMATCH);
        assert!(status.status_message().contains("someone-elses-job"));

        handle.abort();
    }
}
