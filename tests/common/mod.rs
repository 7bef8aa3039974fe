use actix_http::Request;
use actix_service::Service;
use actix_web::{body::MessageBody, dev::ServiceResponse, test, Error};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::{Builder, TempDir};

use docserve::build::{BuildJob, Queue};
use docserve::config::Config;
use docserve::db::models::{build_job, imported_file, project, version};
use docserve::db::{self, DatabaseConnection, DatabaseTransaction, Tx};
use docserve::notify::Notifier;
use docserve::server::{api::state::App as AppState, app::init_app};

pub use docserve::db::models::{
    build_job::QueuedJob, project::Project, version::Version,
};

/// Notifier that remembers every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, subject: &str, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_owned(), message.to_owned()));
    }
}

/// Queue that refuses every job.
pub struct FailingQueue;

#[async_trait]
impl Queue for FailingQueue {
    async fn enqueue(&self, _job: &BuildJob) -> anyhow::Result<()> {
        anyhow::bail!("queue is full")
    }
}

/// Temporary database, build root and app state for one test.
pub struct TestContext {
    pub dir: TempDir,
    pub db: DatabaseConnection,
    pub notifier: Arc<RecordingNotifier>,
    pub config: Config,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = Builder::new().prefix("docserve").tempdir().unwrap();
        let db = db::init::connect(&database_url(dir.path())).await.unwrap();
        let config = Config {
            doc_root: dir.path().join("user_builds"),
            ..Config::default()
        };
        Self {
            dir,
            db,
            notifier: Arc::new(RecordingNotifier::default()),
            config,
        }
    }

    /// App state queueing builds into the test database.
    pub fn state(&self) -> AppState {
        self.state_with_queue(Arc::new(self.db.clone()))
    }

    pub fn state_with_queue(&self, queue: Arc<dyn Queue>) -> AppState {
        AppState::new(
            self.db.clone(),
            self.config.clone(),
            queue,
            Arc::clone(&self.notifier) as Arc<dyn Notifier>,
        )
    }

    pub async fn create_project(&self, project: &Project) -> i64 {
        let mut tx = DatabaseTransaction::begin(self.db.pool.clone()).await.unwrap();
        let id = project::TxManager::create(&mut tx, project)
            .await
            .unwrap()
            .unwrap();
        tx.commit().await.unwrap();
        id
    }

    pub async fn create_version(&self, project: i64, slug: &str, identifier: &str, active: bool) -> i64 {
        let mut version = Version::new(project, slug, identifier);
        version.active = i64::from(active);
        let mut tx = DatabaseTransaction::begin(self.db.pool.clone()).await.unwrap();
        let id = version::TxManager::create(&mut tx, &version)
            .await
            .unwrap()
            .unwrap();
        tx.commit().await.unwrap();
        id
    }

    pub async fn create_imported_file(&self, project: i64, version: Option<i64>, name: &str, path: &str) -> i64 {
        let mut tx = DatabaseTransaction::begin(self.db.pool.clone()).await.unwrap();
        let id = imported_file::TxManager::create(&mut tx, project, version, name, path)
            .await
            .unwrap()
            .unwrap();
        tx.commit().await.unwrap();
        id
    }

    pub async fn jobs(&self, project: i64) -> Vec<QueuedJob> {
        build_job::Manager::find_all_by_project(&self.db, project)
            .await
            .unwrap()
    }
}

pub fn database_url(dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", dir.join("db.sqlite3").to_string_lossy())
}

/// A git project with the given slug and repository URL.
pub fn project(slug: &str, repo: &str) -> Project {
    Project::new(slug, slug, repo)
}

pub async fn initialize_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(init_app(state).unwrap()).await
}

pub async fn body_string(resp: ServiceResponse<impl MessageBody>) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn github_payload(name: &str, url: &str, branch: &str) -> String {
    format!(
        r#"{{"repository":{{"name":"{name}","url":"{url}"}},"ref":"refs/heads/{branch}"}}"#
    )
}

pub fn bitbucket_payload(name: &str, absolute_url: &str) -> String {
    format!(r#"{{"repository":{{"name":"{name}","absolute_url":"{absolute_url}"}}}}"#)
}
