//! Scripted runtime for exercising the harness without a daemon.
//!
//! A [`ScriptedContainer`] replays a fixed sequence of statuses, one per
//! [`reload`](ContainerHandle::reload), then keeps reporting the last one.
//! Its logs stay empty until a [`wait`](ContainerHandle::wait) has returned,
//! like a container that has not flushed its output yet.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use smoke_common::{ContainerName, ContainerStatus, ExitStatus, SmokeError, SmokeResult};

use crate::runtime::{ContainerHandle, ContainerRuntime, RunSpec};

/// A container whose observable behaviour is fixed up front.
#[derive(Debug, Clone)]
pub struct ScriptedContainer {
    name: ContainerName,
    script: VecDeque<ContainerStatus>,
    status: ContainerStatus,
    reloads: u32,
    reload_error: Option<String>,
    exit: Result<i64, String>,
    never_exits: bool,
    exited: Arc<AtomicBool>,
    logs: String,
}

impl ScriptedContainer {
    /// A container that reports `statuses` on successive reloads and exits 0.
    pub fn new(statuses: impl IntoIterator<Item = ContainerStatus>) -> Self {
        Self {
            name: ContainerName::default(),
            script: statuses.into_iter().collect(),
            status: ContainerStatus::Created,
            reloads: 0,
            reload_error: None,
            exit: Ok(0),
            never_exits: false,
            exited: Arc::new(AtomicBool::new(false)),
            logs: String::new(),
        }
    }

    /// A container that stays `created` for `n` reloads, then reports `then`.
    #[must_use]
    pub fn created_for(n: usize, then: ContainerStatus) -> Self {
        Self::new(std::iter::repeat_n(ContainerStatus::Created, n).chain([then]))
    }

    /// Exit with `code`.
    #[must_use]
    pub fn with_exit_code(mut self, code: i64) -> Self {
        self.exit = Ok(code);
        self
    }

    /// Fail the exit wait with a runtime error.
    #[must_use]
    pub fn with_wait_error(mut self, message: impl Into<String>) -> Self {
        self.exit = Err(message.into());
        self
    }

    /// Fail every reload with a runtime error.
    #[must_use]
    pub fn with_reload_error(mut self, message: impl Into<String>) -> Self {
        self.reload_error = Some(message.into());
        self
    }

    /// Never finish the exit wait.
    #[must_use]
    pub fn never_exits(mut self) -> Self {
        self.never_exits = true;
        self
    }

    /// Output returned by [`logs`](ContainerHandle::logs).
    #[must_use]
    pub fn with_logs(mut self, logs: impl Into<String>) -> Self {
        self.logs = logs.into();
        self
    }

    /// Number of reloads performed so far.
    #[must_use]
    pub fn reloads(&self) -> u32 {
        self.reloads
    }
}

#[async_trait]
impl ContainerHandle for ScriptedContainer {
    fn name(&self) -> &ContainerName {
        &self.name
    }

    fn status(&self) -> ContainerStatus {
        self.status
    }

    async fn reload(&mut self) -> SmokeResult<()> {
        if let Some(message) = &self.reload_error {
            return Err(SmokeError::runtime(message));
        }
        self.reloads += 1;
        if let Some(next) = self.script.pop_front() {
            self.status = next;
        }
        Ok(())
    }

    async fn wait(&self) -> SmokeResult<ExitStatus> {
        if self.never_exits {
            std::future::pending::<()>().await;
        }
        let exit = self
            .exit
            .clone()
            .map(ExitStatus::new)
            .map_err(SmokeError::runtime)?;
        self.exited.store(true, Ordering::SeqCst);
        Ok(exit)
    }

    async fn logs(&self) -> SmokeResult<String> {
        if self.exited.load(Ordering::SeqCst) {
            Ok(self.logs.clone())
        } else {
            Ok(String::new())
        }
    }
}

/// Hands out copies of one [`ScriptedContainer`] and records removals.
#[derive(Debug)]
pub struct ScriptedRuntime {
    template: ScriptedContainer,
    start_error: Option<String>,
    remove_error: Option<String>,
    runs: AtomicUsize,
    removed: Mutex<Vec<String>>,
}

impl ScriptedRuntime {
    /// A runtime whose containers behave like `template`.
    #[must_use]
    pub fn new(template: ScriptedContainer) -> Self {
        Self {
            template,
            start_error: None,
            remove_error: None,
            runs: AtomicUsize::new(0),
            removed: Mutex::new(Vec::new()),
        }
    }

    /// A runtime that cannot start anything.
    #[must_use]
    pub fn failing_to_start(message: impl Into<String>) -> Self {
        Self {
            start_error: Some(message.into()),
            ..Self::new(ScriptedContainer::new([]))
        }
    }

    /// Fail removals with a runtime error.
    #[must_use]
    pub fn with_remove_error(mut self, message: impl Into<String>) -> Self {
        self.remove_error = Some(message.into());
        self
    }

    /// Number of containers started.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Names of removed containers, in removal order.
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().clone()
    }
}

#[async_trait]
impl ContainerRuntime for ScriptedRuntime {
    type Handle = ScriptedContainer;

    async fn run(&self, spec: &RunSpec) -> SmokeResult<ScriptedContainer> {
        if let Some(message) = &self.start_error {
            return Err(SmokeError::runtime(message));
        }
        self.runs.fetch_add(1, Ordering::SeqCst);

        let mut container = self.template.clone();
        container.name = spec.name.clone();
        container.exited = Arc::new(AtomicBool::new(false));
        Ok(container)
    }

    async fn force_remove(&self, handle: &ScriptedContainer) -> SmokeResult<()> {
        if let Some(message) = &self.remove_error {
            return Err(SmokeError::runtime(message));
        }
        self.removed.lock().push(handle.name.to_string());
        Ok(())
    }
}
