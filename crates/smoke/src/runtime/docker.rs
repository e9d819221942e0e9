//! Docker Engine runtime backed by `bollard`.

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, WaitContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::image::CreateImageOptions;
use bollard::models::{ContainerState, ContainerStateStatusEnum, ContainerWaitResponse};
use futures::{StreamExt, TryStreamExt};
use smoke_common::{ContainerName, ContainerStatus, ExitStatus, SmokeError, SmokeResult};

use super::handle::{ContainerHandle, ContainerRuntime, RunSpec};

const NOT_FOUND: u16 = 404;

/// Client for the local Docker daemon.
///
/// Build one per process and pass it to whatever needs it.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the local defaults (`DOCKER_HOST` or the unix socket).
    pub fn connect() -> SmokeResult<Self> {
        let docker = Docker::connect_with_local_defaults().map_err(SmokeError::runtime)?;
        Ok(Self { docker })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(docker: Docker) -> Self {
        Self { docker }
    }

    async fn pull(&self, image: &str) -> SmokeResult<()> {
        tracing::info!(image, "Pulling image");

        let options = CreateImageOptions {
            from_image: image,
            ..Default::default()
        };
        self.docker
            .create_image(Some(options), None, None)
            .try_collect::<Vec<_>>()
            .await
            .map_err(SmokeError::runtime)?;

        Ok(())
    }

    async fn create(&self, spec: &RunSpec) -> Result<String, BollardError> {
        let options = CreateContainerOptions {
            name: spec.name.as_str(),
            platform: None,
        };
        let config = Config {
            image: Some(spec.image.clone()),
            env: Some(spec.env.clone()),
            ..Default::default()
        };

        let response = self.docker.create_container(Some(options), config).await?;
        for warning in &response.warnings {
            tracing::warn!(container = %spec.name, warning = %warning, "Runtime warning on create");
        }

        Ok(response.id)
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    type Handle = DockerContainer;

    async fn run(&self, spec: &RunSpec) -> SmokeResult<DockerContainer> {
        tracing::info!(container = %spec.name, image = %spec.image, "Creating container");

        let id = match self.create(spec).await {
            Ok(id) => id,
            Err(err) if is_not_found(&err) => {
                self.pull(&spec.image).await?;
                self.create(spec).await.map_err(SmokeError::runtime)?
            }
            Err(err) => return Err(SmokeError::runtime(err)),
        };

        self.docker
            .start_container(&id, None::<StartContainerOptions<String>>)
            .await
            .map_err(SmokeError::runtime)?;

        tracing::info!(container = %spec.name, id = %id, "Started container");

        Ok(DockerContainer {
            docker: self.docker.clone(),
            id,
            name: spec.name.clone(),
            status: ContainerStatus::Created,
        })
    }

    async fn force_remove(&self, handle: &DockerContainer) -> SmokeResult<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };

        match self.docker.remove_container(&handle.id, Some(options)).await {
            Ok(()) => {
                tracing::info!(container = %handle.name, "Removed container");
                Ok(())
            }
            Err(err) if is_not_found(&err) => {
                tracing::debug!(container = %handle.name, "Container already removed");
                Ok(())
            }
            Err(err) => Err(SmokeError::runtime(err)),
        }
    }
}

/// A container started by [`DockerRuntime`].
#[derive(Debug)]
pub struct DockerContainer {
    docker: Docker,
    id: String,
    name: ContainerName,
    status: ContainerStatus,
}

impl DockerContainer {
    fn map_err(&self, err: BollardError) -> SmokeError {
        container_error(&self.name, err)
    }
}

#[async_trait]
impl ContainerHandle for DockerContainer {
    fn name(&self) -> &ContainerName {
        &self.name
    }

    fn status(&self) -> ContainerStatus {
        self.status
    }

    async fn reload(&mut self) -> SmokeResult<()> {
        let response = self
            .docker
            .inspect_container(&self.id, None::<InspectContainerOptions>)
            .await
            .map_err(|err| self.map_err(err))?;

        let status = reported_status(response.state);
        check_transition(&self.name, self.status, status);
        self.status = status;

        Ok(())
    }

    async fn wait(&self) -> SmokeResult<ExitStatus> {
        let mut stream = Box::pin(
            self.docker
                .wait_container(&self.id, None::<WaitContainerOptions<String>>),
        );

        exit_from_wait(&self.name, stream.next().await)
    }

    async fn logs(&self) -> SmokeResult<String> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            ..Default::default()
        };

        let chunks: Vec<_> = self
            .docker
            .logs(&self.id, Some(options))
            .try_collect()
            .await
            .map_err(|err| self.map_err(err))?;

        Ok(chunks
            .into_iter()
            .map(|chunk| String::from_utf8_lossy(&chunk.into_bytes()).into_owned())
            .collect())
    }
}

fn is_not_found(err: &BollardError) -> bool {
    matches!(
        err,
        BollardError::DockerResponseServerError { status_code, .. } if *status_code == NOT_FOUND
    )
}

fn container_error(name: &ContainerName, err: BollardError) -> SmokeError {
    if is_not_found(&err) {
        SmokeError::ContainerNotFound {
            name: name.to_string(),
        }
    } else {
        SmokeError::runtime(err)
    }
}

/// Exit status from the first item of a wait stream.
fn exit_from_wait(
    name: &ContainerName,
    next: Option<Result<ContainerWaitResponse, BollardError>>,
) -> SmokeResult<ExitStatus> {
    match next {
        Some(Ok(response)) => Ok(ExitStatus::new(response.status_code)),
        // bollard reports non-zero exit codes as an error variant
        Some(Err(BollardError::DockerContainerWaitError { code, .. })) => {
            Ok(ExitStatus::new(code))
        }
        Some(Err(err)) => Err(container_error(name, err)),
        None => Err(SmokeError::runtime(format!("wait for {name} ended without an exit status"))),
    }
}

/// Warns when the runtime reports a status that cannot follow `from`.
fn check_transition(name: &ContainerName, from: ContainerStatus, to: ContainerStatus) -> bool {
    let allowed = from.can_transition_to(to);
    if !allowed {
        tracing::warn!(
            container = %name,
            from = %from,
            to = %to,
            "Runtime reported a status regression"
        );
    }
    allowed
}

fn reported_status(state: Option<ContainerState>) -> ContainerStatus {
    state
        .and_then(|state| state.status)
        .map_or(ContainerStatus::Unknown, status_from_runtime)
}

fn status_from_runtime(status: ContainerStateStatusEnum) -> ContainerStatus {
    match status {
        ContainerStateStatusEnum::CREATED => ContainerStatus::Created,
        ContainerStateStatusEnum::RUNNING => ContainerStatus::Running,
        ContainerStateStatusEnum::PAUSED => ContainerStatus::Paused,
        ContainerStateStatusEnum::RESTARTING => ContainerStatus::Restarting,
        ContainerStateStatusEnum::REMOVING => ContainerStatus::Removing,
        ContainerStateStatusEnum::EXITED => ContainerStatus::Exited,
        ContainerStateStatusEnum::DEAD => ContainerStatus::Dead,
        _ => ContainerStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_statuses_map_onto_local_ones() {
        assert_eq!(
            status_from_runtime(ContainerStateStatusEnum::CREATED),
            ContainerStatus::Created
        );
        assert_eq!(
            status_from_runtime(ContainerStateStatusEnum::RUNNING),
            ContainerStatus::Running
        );
        assert_eq!(
            status_from_runtime(ContainerStateStatusEnum::EXITED),
            ContainerStatus::Exited
        );
        assert_eq!(
            status_from_runtime(ContainerStateStatusEnum::EMPTY),
            ContainerStatus::Unknown
        );
    }

    #[test]
    fn not_found_detection() {
        let missing = BollardError::DockerResponseServerError {
            status_code: 404,
            message: "No such container: main".to_string(),
        };
        let conflict = BollardError::DockerResponseServerError {
            status_code: 409,
            message: "Conflict".to_string(),
        };
        assert!(is_not_found(&missing));
        assert!(!is_not_found(&conflict));
    }

    #[test]
    fn missing_state_is_unknown() {
        assert_eq!(reported_status(None), ContainerStatus::Unknown);
        assert_eq!(
            reported_status(Some(ContainerState::default())),
            ContainerStatus::Unknown
        );
        assert_eq!(
            reported_status(Some(ContainerState {
                status: Some(ContainerStateStatusEnum::RUNNING),
                ..Default::default()
            })),
            ContainerStatus::Running
        );
    }

    #[test]
    fn clean_exit_from_wait_response() {
        let name = ContainerName::default();
        let response = ContainerWaitResponse {
            status_code: 0,
            error: None,
        };

        let exit = exit_from_wait(&name, Some(Ok(response))).unwrap();
        assert!(exit.is_clean());
    }

    #[test]
    fn non_zero_exit_is_a_status_not_an_error() {
        let name = ContainerName::default();
        let err = BollardError::DockerContainerWaitError {
            error: String::new(),
            code: 1,
        };

        let exit = exit_from_wait(&name, Some(Err(err))).unwrap();
        assert_eq!(exit, ExitStatus::new(1));
        assert!(!exit.is_clean());
    }

    #[test]
    fn vanished_container_during_wait() {
        let name = ContainerName::default();
        let err = BollardError::DockerResponseServerError {
            status_code: 404,
            message: "No such container: main".to_string(),
        };

        let result = exit_from_wait(&name, Some(Err(err)));
        assert!(matches!(
            result,
            Err(SmokeError::ContainerNotFound { name }) if name == "main"
        ));
    }

    #[test]
    fn empty_wait_stream_is_a_runtime_error() {
        let result = exit_from_wait(&ContainerName::default(), None);
        match result {
            Err(SmokeError::Runtime { message }) => {
                assert_eq!(message, "wait for main ended without an exit status");
            }
            other => panic!("expected runtime error, got {other:?}"),
        }
    }

    #[test_log::test]
    fn regression_to_created_is_flagged() {
        let name = ContainerName::default();
        assert!(check_transition(&name, ContainerStatus::Created, ContainerStatus::Running));
        assert!(check_transition(&name, ContainerStatus::Running, ContainerStatus::Exited));
        assert!(!check_transition(&name, ContainerStatus::Running, ContainerStatus::Created));
        assert!(!check_transition(&name, ContainerStatus::Exited, ContainerStatus::Created));
    }
}
