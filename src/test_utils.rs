//! Test utilities: a controllable clock, an in-memory judge and fixtures

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;
use tokio::sync::Barrier;

use crate::{
    config::StorageConfig,
    error::AppResult,
    models::{Contest, Problem, ProblemId, Submission, UserId, Verdict},
    source::ProblemSource,
    storage::{HandleStore, PendingVerification},
    utils::Clock,
};

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// In-memory judge whose submission feed can grow during a test
pub struct FakeSource {
    problems: Vec<Problem>,
    contests: Vec<Contest>,
    submissions: Mutex<Vec<(String, Submission)>>,
}

impl FakeSource {
    pub fn new(problems: Vec<Problem>, contests: Vec<Contest>) -> Self {
        Self {
            problems,
            contests,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn push_submission(&self, handle: &str, problem: &ProblemId, at: i64, verdict: Verdict) {
        let mut submissions = self.submissions.lock().unwrap();
        let id = submissions.len() as i64 + 1;
        submissions.push((
            handle.to_string(),
            Submission {
                id,
                creation_time_seconds: at,
                problem: problem.clone(),
                verdict,
            },
        ));
    }
}

#[async_trait]
impl ProblemSource for FakeSource {
    async fn fetch_problems(&self) -> AppResult<Vec<Problem>> {
        Ok(self.problems.clone())
    }

    async fn fetch_contests(&self) -> AppResult<Vec<Contest>> {
        Ok(self.contests.clone())
    }

    async fn fetch_user_submissions(
        &self,
        handle: &str,
        count: u32,
    ) -> AppResult<Vec<Submission>> {
        let submissions = self.submissions.lock().unwrap();
        Ok(submissions
            .iter()
            .rev()
            .filter(|(h, _)| h == handle)
            .take(count as usize)
            .map(|(_, s)| s.clone())
            .collect())
    }
}

/// Wraps a [`FakeSource`] so submission fetches only return once `fetches` of them
/// are in flight together
pub struct GatedSource {
    inner: FakeSource,
    gate: Barrier,
}

impl GatedSource {
    pub fn new(inner: FakeSource, fetches: usize) -> Self {
        Self {
            inner,
            gate: Barrier::new(fetches),
        }
    }

    pub fn inner(&self) -> &FakeSource {
        &self.inner
    }
}

#[async_trait]
impl ProblemSource for GatedSource {
    async fn fetch_problems(&self) -> AppResult<Vec<Problem>> {
        self.inner.fetch_problems().await
    }

    async fn fetch_contests(&self) -> AppResult<Vec<Contest>> {
        self.inner.fetch_contests().await
    }

    async fn fetch_user_submissions(
        &self,
        handle: &str,
        count: u32,
    ) -> AppResult<Vec<Submission>> {
        self.gate.wait().await;
        self.inner.fetch_user_submissions(handle, count).await
    }
}

/// Twelve recent contests with one problem per rating step from 800 to 2000
pub fn problem_pool() -> (Vec<Problem>, Vec<Contest>) {
    let mut problems = Vec::new();
    let mut contests = Vec::new();
    for (n, contest_id) in (1950..1962).enumerate() {
        contests.push(Contest {
            id: contest_id,
            start_time_seconds: Some(1_700_000_000 + n as i64 * 604_800),
        });
        for (i, rating) in (800..=2000).step_by(200).enumerate() {
            problems.push(Problem {
                contest_id,
                index: ((b'A' + i as u8) as char).to_string(),
                name: format!("Problem {}{}", contest_id, i),
                rating: Some(rating),
            });
        }
    }
    (problems, contests)
}

/// A handle store in a fresh temporary directory, pre-populated with links
pub async fn linked_store(links: &[(UserId, &str)]) -> (HandleStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        user_data_file: dir.path().join("user_data.json"),
        pending_auth_file: dir.path().join("pending_auth.json"),
    };
    let store = HandleStore::load(&config).await.unwrap();
    for (user, handle) in links {
        store
            .add_pending(
                *user,
                PendingVerification {
                    handle: handle.to_string(),
                    problem: ProblemId::new(4, "A"),
                    requested_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        store.complete_verification(*user).await.unwrap();
    }
    (store, dir)
}
