#![allow(dead_code)]

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock interview service plus an isolated data directory.
pub struct TestEnv {
    pub dir: TempDir,
    pub server: MockServer,
}

impl TestEnv {
    pub async fn start() -> Self {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        TestEnv { dir, server }
    }

    /// A service that already has `interviews` stored.
    pub async fn with_interviews(interviews: Value) -> Self {
        let env = Self::start().await;
        Mock::given(method("GET"))
            .and(path("/interviews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(interviews))
            .mount(&env.server)
            .await;
        env
    }

    /// Get a Command configured to run hirecal against the mock service.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo_bin_cmd!("hirecal");
        cmd.env("XDG_DATA_HOME", self.dir.path().join("data"));
        cmd.env("HIRECAL_API_URL", self.server.uri());
        cmd.env("HIRECAL_TOKEN", "test-token");
        cmd.env_remove("HIRECAL_LOG");
        // Ensure no color codes pollute test output
        cmd.env("NO_COLOR", "1");
        // Bucket by UTC so fixture dates don't depend on the host zone
        cmd.arg("--utc");
        cmd
    }

    /// Get a Command with --json flag.
    pub fn cmd_json(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--json");
        cmd
    }
}

/// Run the binary off the async runtime so the mock server keeps serving.
pub async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

pub fn interview(id: &str, scheduled_at: &str, status: &str) -> Value {
    json!({
        "id": id,
        "scheduledAt": scheduled_at,
        "duration": 45,
        "status": status,
        "interviewType": "technical",
        "candidateName": format!("Candidate {}", id),
        "candidateEmail": format!("{}@example.com", id),
        "jobTitle": "Backend Engineer"
    })
}

/// Three interviews in the week of 2026-02-16 and one the week after.
pub fn fixture_interviews() -> Value {
    json!([
        interview("iv-mon-early", "2026-02-16T09:00:00Z", "scheduled"),
        interview("iv-mon-late", "2026-02-16T15:30:00Z", "scheduled"),
        interview("iv-done", "2026-02-18T11:00:00Z", "completed"),
        interview("iv-cancelled", "2026-02-19T10:00:00Z", "cancelled"),
        interview("iv-next-week", "2026-02-24T09:00:00Z", "scheduled"),
    ])
}
