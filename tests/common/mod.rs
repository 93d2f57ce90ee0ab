//! Fakes and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lsp_types::PublishDiagnosticsParams;
use parking_lot::Mutex;

use modelsync::ide::{Compiler, DeployParams, DeployResult, Deployer, DiagnosticsPublisher, Host, ServerMessage};
use modelsync::lint::LintFailure;
use modelsync::notify::MessageLog;
use modelsync::project::{BundledModels, PROJECT_SETTINGS_FILE_NAME};
use modelsync::settings::Settings;
use modelsync::workspace::{WorkspaceFolder, WorkspaceState};

/// Writes a project declaration into `path`, creating it.
pub fn write_project(path: &Path, name: &str, version: &str) {
    std::fs::create_dir_all(path.join("Domain")).unwrap();
    std::fs::write(path.join("Domain/Entity.metaed"), "Domain Entity Student\n").unwrap();
    std::fs::write(
        path.join(PROJECT_SETTINGS_FILE_NAME),
        format!(r#"{{"modelProject": {{"projectName": "{name}", "projectVersion": "{version}"}}}}"#),
    )
    .unwrap();
}

/// Restores write access below `path` so temp dirs can be removed.
pub fn make_writable(path: &Path) {
    for entry in walkdir::WalkDir::new(path).into_iter().flatten() {
        if let Ok(metadata) = entry.metadata() {
            let mut permissions = metadata.permissions();
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            let _ = std::fs::set_permissions(entry.path(), permissions);
        }
    }
}

#[derive(Default)]
pub struct FakeCompiler {
    pub failures: Mutex<Vec<LintFailure>>,
    pub build_result: Mutex<bool>,
    pub lint_calls: AtomicUsize,
    pub build_calls: AtomicUsize,
    pub last_message: Mutex<Option<ServerMessage>>,
}

impl FakeCompiler {
    pub fn lint_calls(&self) -> usize {
        self.lint_calls.load(Ordering::SeqCst)
    }

    pub fn build_calls(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compiler for FakeCompiler {
    async fn lint(&self, message: &ServerMessage) -> Vec<LintFailure> {
        self.lint_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock() = Some(message.clone());
        self.failures.lock().clone()
    }

    async fn build(&self, message: &ServerMessage) -> bool {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock() = Some(message.clone());
        *self.build_result.lock()
    }
}

#[derive(Default)]
pub struct FakeDeployer {
    pub result: Mutex<DeployResult>,
    pub calls: Mutex<Vec<DeployParams>>,
}

#[async_trait]
impl Deployer for FakeDeployer {
    async fn deploy(&self, params: &DeployParams) -> DeployResult {
        self.calls.lock().push(params.clone());
        self.result.lock().clone()
    }
}

#[derive(Default)]
pub struct Recorder {
    pub published: Mutex<Vec<PublishDiagnosticsParams>>,
}

impl Recorder {
    /// Publishes for `file:` documents only, leaving out the license document.
    pub fn file_publishes(&self) -> Vec<PublishDiagnosticsParams> {
        self.published
            .lock()
            .iter()
            .filter(|p| p.uri.scheme() == "file")
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DiagnosticsPublisher for Recorder {
    async fn publish(&self, params: PublishDiagnosticsParams) {
        tokio::task::yield_now().await;
        self.published.lock().push(params);
    }
}

/// A host over a temporary directory with a bundled model storage tree.
pub struct Fixture {
    pub root: tempfile::TempDir,
    pub host: Host,
    pub state: Arc<WorkspaceState>,
    pub log: Arc<MessageLog>,
    pub compiler: Arc<FakeCompiler>,
    pub deployer: Arc<FakeDeployer>,
    pub recorder: Arc<Recorder>,
}

impl Fixture {
    pub fn new(folders: Vec<WorkspaceFolder>) -> Self {
        let root = tempfile::tempdir().unwrap();
        let state = Arc::new(WorkspaceState::open(folders));
        let log = Arc::new(MessageLog::new());
        let compiler = Arc::new(FakeCompiler::default());
        let deployer = Arc::new(FakeDeployer::default());
        let recorder = Arc::new(Recorder::default());
        let host = Host {
            settings: Settings::in_memory(),
            folders: state.clone(),
            notifier: log.clone(),
            publisher: recorder.clone(),
            compiler: compiler.clone(),
            deployer: deployer.clone(),
            bundled: BundledModels::new(root.path().join("bundled")),
        };
        Self {
            root,
            host,
            state,
            log,
            compiler,
            deployer,
            recorder,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.host.settings
    }

    pub fn bundled_folder(&self, name: &str) -> PathBuf {
        self.host.bundled.folder(name)
    }

    /// Creates a bundled model project and returns its path.
    pub fn bundled_project(&self, folder: &str, version: &str) -> PathBuf {
        let path = self.bundled_folder(folder);
        write_project(&path, "Ed-Fi", version);
        path
    }

    /// Creates a project outside the bundled tree and returns its path.
    pub fn user_project(&self, folder: &str, name: &str, version: &str) -> PathBuf {
        let path = self.root.path().join(folder);
        write_project(&path, name, version);
        path
    }

    /// Points settings and the workspace at a bundled model folder.
    pub fn use_model(&self, folder: &str, platform: &str, model: &str) -> PathBuf {
        let path = self.bundled_project(folder, model);
        self.settings().set_platform_version(platform).unwrap();
        self.settings().set_model_version(model).unwrap();
        self.settings().set_model_directory(&path.to_string_lossy()).unwrap();
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        make_writable(self.root.path());
    }
}
