//! Codeforces API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::CodeforcesConfig,
    error::{AppError, AppResult},
    models::{Contest, Problem, ProblemId, Submission, Verdict},
};

use super::ProblemSource;

/// HTTP client for `https://codeforces.com/api/`
#[derive(Debug, Clone)]
pub struct CodeforcesClient {
    http: Client,
    api_base: String,
}

impl CodeforcesClient {
    /// Build a client from configuration
    pub fn new(config: &CodeforcesConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("cpduel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
        })
    }

    /// Call an API method and unwrap the `{status, result, comment}` envelope
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = Url::parse_with_params(&format!("{}{}", self.api_base, method), params)
            .map_err(|e| AppError::Upstream(format!("Invalid Codeforces URL: {}", e)))?;

        debug!(method = %method, "Calling Codeforces API");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        match response.json::<ApiEnvelope<T>>().await {
            Ok(envelope) => envelope.into_result(method),
            Err(_) if !status.is_success() => Err(AppError::Upstream(format!(
                "{} returned HTTP {}",
                method, status
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ProblemSource for CodeforcesClient {
    async fn fetch_problems(&self) -> AppResult<Vec<Problem>> {
        let result: ProblemsetResult = self.call("problemset.problems", &[]).await?;
        Ok(result
            .problems
            .into_iter()
            .filter_map(RawProblem::into_problem)
            .collect())
    }

    async fn fetch_contests(&self) -> AppResult<Vec<Contest>> {
        let contests: Vec<RawContest> = self.call("contest.list", &[]).await?;
        Ok(contests.into_iter().map(Into::into).collect())
    }

    async fn fetch_user_submissions(
        &self,
        handle: &str,
        count: u32,
    ) -> AppResult<Vec<Submission>> {
        let submissions: Vec<RawSubmission> = self
            .call(
                "user.status",
                &[
                    ("handle", handle.to_string()),
                    ("from", "1".to_string()),
                    ("count", count.to_string()),
                ],
            )
            .await?;

        Ok(submissions
            .into_iter()
            .filter_map(RawSubmission::into_submission)
            .collect())
    }
}

// Wire formats

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    result: Option<T>,
    comment: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn into_result(self, method: &str) -> AppResult<T> {
        match (self.status.as_str(), self.result) {
            ("OK", Some(result)) => Ok(result),
            _ => Err(AppError::Upstream(format!(
                "{} failed: {}",
                method,
                self.comment.unwrap_or_else(|| self.status.clone())
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProblemsetResult {
    problems: Vec<RawProblem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProblem {
    contest_id: Option<i64>,
    index: String,
    #[serde(default)]
    name: String,
    rating: Option<i32>,
}

impl RawProblem {
    /// Problems outside a contest (gym drafts, acm.sgu) cannot be duelled on
    fn into_problem(self) -> Option<Problem> {
        Some(Problem {
            contest_id: self.contest_id?,
            index: self.index,
            name: self.name,
            rating: self.rating,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    id: i64,
    start_time_seconds: Option<i64>,
}

impl From<RawContest> for Contest {
    fn from(raw: RawContest) -> Self {
        Contest {
            id: raw.id,
            start_time_seconds: raw.start_time_seconds,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubmission {
    id: i64,
    creation_time_seconds: i64,
    problem: RawProblem,
    verdict: Option<String>,
}

impl RawSubmission {
    fn into_submission(self) -> Option<Submission> {
        let verdict = Verdict::from_codeforces(self.verdict.as_deref());
        Some(Submission {
            id: self.id,
            creation_time_seconds: self.creation_time_seconds,
            problem: ProblemId::new(self.problem.contest_id?, self.problem.index),
            verdict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problemset_payload() {
        let json = r#"{
            "status": "OK",
            "result": {
                "problems": [
                    {"contestId": 1850, "index": "C", "name": "Word on the Paper", "type": "PROGRAMMING", "rating": 800, "tags": ["implementation"]},
                    {"contestId": 1850, "index": "H", "name": "The Third Letter", "type": "PROGRAMMING", "tags": []},
                    {"index": "A", "name": "Orphan", "type": "PROGRAMMING"}
                ],
                "problemStatistics": []
            }
        }"#;

        let envelope: ApiEnvelope<ProblemsetResult> = serde_json::from_str(json).unwrap();
        let problems: Vec<Problem> = envelope
            .into_result("problemset.problems")
            .unwrap()
            .problems
            .into_iter()
            .filter_map(RawProblem::into_problem)
            .collect();

        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].rating, Some(800));
        assert_eq!(problems[1].rating, None);
    }

    #[test]
    fn test_submission_payload() {
        let json = r#"{
            "status": "OK",
            "result": [
                {"id": 9001, "contestId": 1850, "creationTimeSeconds": 1700000100,
                 "problem": {"contestId": 1850, "index": "C", "name": "Word on the Paper"},
                 "programmingLanguage": "Rust 2021", "verdict": "OK"},
                {"id": 9000, "contestId": 1850, "creationTimeSeconds": 1700000000,
                 "problem": {"contestId": 1850, "index": "C", "name": "Word on the Paper"},
                 "verdict": "WRONG_ANSWER"}
            ]
        }"#;

        let envelope: ApiEnvelope<Vec<RawSubmission>> = serde_json::from_str(json).unwrap();
        let submissions: Vec<Submission> = envelope
            .into_result("user.status")
            .unwrap()
            .into_iter()
            .filter_map(RawSubmission::into_submission)
            .collect();

        assert_eq!(submissions.len(), 2);
        assert!(submissions[0].is_accepted());
        assert_eq!(submissions[1].verdict, Verdict::Rejected);
        assert_eq!(submissions[0].problem, ProblemId::new(1850, "C"));
    }

    #[test]
    fn test_failed_envelope() {
        let json = r#"{"status": "FAILED", "comment": "handle: User with handle nobody_xyz not found"}"#;
        let envelope: ApiEnvelope<Vec<RawSubmission>> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result("user.status").unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("not found")));
    }

    #[test]
    fn test_contest_without_start() {
        let json = r#"{"status": "OK", "result": [
            {"id": 1850, "name": "Codeforces Round 886", "startTimeSeconds": 1689950100},
            {"id": 2100, "name": "Unscheduled"}
        ]}"#;
        let envelope: ApiEnvelope<Vec<RawContest>> = serde_json::from_str(json).unwrap();
        let contests: Vec<Contest> = envelope
            .into_result("contest.list")
            .unwrap()
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(contests[0].start_time_seconds, Some(1_689_950_100));
        assert_eq!(contests[1].start_time_seconds, None);
    }
}
