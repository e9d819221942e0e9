//! Scoped containers: run, hand out, always remove.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;
use smoke_common::SmokeResult;

use super::handle::{ContainerHandle, ContainerRuntime, RunSpec};

/// Run a container for the duration of `body`.
///
/// The container is force-removed once `body` finishes, whether it returned
/// or panicked; a panic resumes after removal. A failed removal is logged and
/// does not replace the body's value. If the container cannot be started,
/// `body` is not called and nothing is removed.
pub async fn with_container<R, F, T>(runtime: &R, spec: &RunSpec, body: F) -> SmokeResult<T>
where
    R: ContainerRuntime,
    F: for<'a> FnOnce(&'a mut R::Handle) -> BoxFuture<'a, T>,
{
    let mut handle = runtime.run(spec).await?;

    let result = AssertUnwindSafe(body(&mut handle)).catch_unwind().await;

    if let Err(err) = runtime.force_remove(&handle).await {
        tracing::warn!(
            container = %handle.name(),
            error = %err,
            "Failed to remove container"
        );
    }

    match result {
        Ok(value) => Ok(value),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
