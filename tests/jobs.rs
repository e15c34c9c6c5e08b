#![cfg(feature = "jobs")]

mod common;

mod health {
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;
    use ultrasinger_client_sdk::jobs::Client;

    #[tokio::test]
    async fn health_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(StatusCode::OK).json_body(json!({
                "status": "healthy",
                "jobs_active": 1,
                "jobs_queued": 3,
                "jobs_total": 12
            }));
        });

        let response = client.health().await?;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.jobs_active, 1);
        assert_eq!(response.jobs_queued, 3);
        assert_eq!(response.jobs_total, 12);
        mock.assert();

        Ok(())
    }
}

mod upload {
    use httpmock::{Method::POST, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;
    use ultrasinger_client_sdk::error::{Kind, Status};
    use ultrasinger_client_sdk::jobs::Client;

    #[tokio::test]
    async fn upload_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/upload")
                .header_exists("content-type")
                .body_includes("song.mp3");
            then.status(StatusCode::OK).json_body(json!({
                "filename": "song.mp3",
                "size": 4,
                "upload_id": "upload-1"
            }));
        });

        let response = client.upload("song.mp3", b"RIFF".to_vec()).await?;

        assert_eq!(response.filename, "song.mp3");
        assert_eq!(response.size, 4);
        assert_eq!(response.upload_id, "upload-1");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn upload_with_progress_reports_byte_counts() -> anyhow::Result<()> {
        use std::sync::{Arc, Mutex};

        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(StatusCode::OK).json_body(json!({
                "filename": "song.mp3",
                "size": 196_608,
                "upload_id": "upload-2"
            }));
        });

        // Three 64 KiB chunks, so the callback fires more than once
        let payload = vec![0_u8; 192 * 1024];
        let total = payload.len() as u64;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let response = client
            .upload_with_progress("song.mp3", payload, move |sent, total| {
                sink.lock().expect("progress sink").push((sent, total));
            })
            .await?;

        assert_eq!(response.upload_id, "upload-2");

        let seen = seen.lock().expect("progress sink");
        assert!(!seen.is_empty(), "progress callback must fire");
        assert!(
            seen.windows(2).all(|pair| pair[0].0 <= pair[1].0),
            "sent bytes must be monotonic"
        );
        assert_eq!(
            seen.last().expect("at least one callback"),
            &(total, total),
            "transfer must finish at (total, total)"
        );
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn rejected_upload_surfaces_status_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(StatusCode::BAD_REQUEST)
                .json_body(json!({ "detail": "Unsupported file type" }));
        });

        let error = client
            .upload("notes.txt", b"abc".to_vec())
            .await
            .expect_err("server rejection must surface");

        assert_eq!(error.kind(), Kind::Status);
        let status = error.downcast_ref::<Status>().expect("status payload");
        assert_eq!(status.status_code, StatusCode::BAD_REQUEST);
        mock.assert();

        Ok(())
    }
}

mod create {
    use httpmock::{Method::POST, MockServer};
    use reqwest::StatusCode;
    use ultrasinger_client_sdk::jobs::types::request::CreateJobRequest;
    use ultrasinger_client_sdk::jobs::{Client, JobSource, JobStatus, QualityPreset};

    use crate::common::{JOB_ID, job_record};

    #[tokio::test]
    async fn create_job_from_youtube_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/jobs/create")
                .json_body_includes(
                    r#"{"source":"youtube","youtube_url":"https://www.youtube.com/watch?v=xyz","language":"en"}"#,
                );
            then.status(StatusCode::OK)
                .json_body(job_record(JOB_ID, "queued"));
        });

        let request = CreateJobRequest::builder()
            .source(JobSource::Youtube)
            .youtube_url("https://www.youtube.com/watch?v=xyz")
            .language("en")
            .quality(QualityPreset::Balanced)
            .build();

        let job = client.create_job(&request).await?;

        assert_eq!(job.job_id, JOB_ID);
        assert_eq!(job.status, JobStatus::Queued);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn create_job_from_upload_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/jobs/create")
                .json_body_includes(r#"{"source":"upload","upload_filename":"song.mp3"}"#);
            then.status(StatusCode::OK)
                .json_body(job_record(JOB_ID, "queued"));
        });

        let request = CreateJobRequest::builder()
            .source(JobSource::Upload)
            .upload_filename("song.mp3")
            .language("it")
            .build();

        let job = client.create_job(&request).await?;

        assert_eq!(job.job_id, JOB_ID);
        mock.assert();

        Ok(())
    }
}

mod get {
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;
    use ultrasinger_client_sdk::error::{Kind, Status};
    use ultrasinger_client_sdk::jobs::{Client, JobStatus, ProcessingStep};

    use crate::common::{JOB_ID, job_record};

    #[tokio::test]
    async fn job_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path(format!("/api/jobs/{JOB_ID}"));
            then.status(StatusCode::OK)
                .json_body(job_record(JOB_ID, "processing"));
        });

        let job = client.job(JOB_ID).await?;

        assert_eq!(job.job_id, JOB_ID);
        assert_eq!(job.status, JobStatus::Processing);
        let progress = job.progress.expect("progress present while processing");
        assert_eq!(progress.step, ProcessingStep::Transcribing);
        assert_eq!(progress.percentage, 45);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn missing_job_surfaces_not_found() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/jobs/missing");
            then.status(StatusCode::NOT_FOUND)
                .json_body(json!({ "detail": "Job not found" }));
        });

        let error = client.job("missing").await.expect_err("404 must surface");

        assert_eq!(error.kind(), Kind::Status);
        let status = error.downcast_ref::<Status>().expect("status payload");
        assert_eq!(status.status_code, StatusCode::NOT_FOUND);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn blank_job_id_fails_before_any_request() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let error = client.job("  ").await.expect_err("blank id must fail");
        assert_eq!(error.kind(), Kind::Validation);

        Ok(())
    }
}

mod list {
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;
    use ultrasinger_client_sdk::jobs::Client;
    use ultrasinger_client_sdk::jobs::types::request::ListJobsRequest;

    use crate::common::{JOB_ID, OTHER_JOB_ID, job_record};

    #[tokio::test]
    async fn jobs_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/jobs");
            then.status(StatusCode::OK).json_body(json!({
                "jobs": [job_record(JOB_ID, "completed"), job_record(OTHER_JOB_ID, "queued")],
                "total": 2
            }));
        });

        let listing = client.jobs(&ListJobsRequest::default()).await?;

        assert_eq!(listing.total, 2);
        assert_eq!(listing.jobs.len(), 2);
        assert_eq!(listing.jobs[0].job_id, JOB_ID);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn jobs_with_pagination_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/jobs")
                .query_param("limit", "10")
                .query_param("offset", "20");
            then.status(StatusCode::OK)
                .json_body(json!({ "jobs": [], "total": 0 }));
        });

        let request = ListJobsRequest::builder().limit(10).offset(20).build();
        let listing = client.jobs(&request).await?;

        assert!(listing.jobs.is_empty());
        mock.assert();

        Ok(())
    }
}

mod cancel_and_delete {
    use httpmock::{Method::DELETE, Method::POST, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;
    use ultrasinger_client_sdk::error::{Kind, Status};
    use ultrasinger_client_sdk::jobs::Client;

    use crate::common::JOB_ID;

    #[tokio::test]
    async fn cancel_job_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST).path(format!("/api/jobs/{JOB_ID}/cancel"));
            then.status(StatusCode::OK)
                .json_body(json!({ "message": "Job cancelled" }));
        });

        let ack = client.cancel_job(JOB_ID).await?;

        assert_eq!(ack.message, "Job cancelled");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn cancel_finished_job_surfaces_conflict() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST).path(format!("/api/jobs/{JOB_ID}/cancel"));
            then.status(StatusCode::CONFLICT)
                .json_body(json!({ "detail": "Job already finished" }));
        });

        let error = client
            .cancel_job(JOB_ID)
            .await
            .expect_err("conflict must surface");

        let status = error.downcast_ref::<Status>().expect("status payload");
        assert_eq!(status.status_code, StatusCode::CONFLICT);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn delete_job_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(DELETE).path(format!("/api/jobs/{JOB_ID}"));
            then.status(StatusCode::OK)
                .json_body(json!({ "message": "Job deleted" }));
        });

        let ack = client.delete_job(JOB_ID).await?;

        assert_eq!(ack.message, "Job deleted");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn blank_job_id_fails_validation() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let error = client.delete_job("").await.expect_err("blank id");
        assert_eq!(error.kind(), Kind::Validation);

        Ok(())
    }
}

mod download {
    use ultrasinger_client_sdk::jobs::Client;

    use crate::common::JOB_ID;

    #[test]
    fn download_url_is_built_without_fetching() -> anyhow::Result<()> {
        let client = Client::new("http://localhost:8000")?;

        assert_eq!(
            client.download_url(JOB_ID),
            format!("http://localhost:8000/api/jobs/{JOB_ID}/download")
        );

        Ok(())
    }
}
