use crate::model::error::Error;
use crate::model::spec::WorkerFleet;
use crate::policy::decision::needs_update;
use crate::service::deployment_svc::DeploymentConverger;
use crate::service::network_svc::ServiceConverger;
use crate::service::status_svc::StatusRecorder;

/// What a single reconcile attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Status already matched the spec, nothing was touched
    UpToDate,
    /// Deployment and Service converged, status recorded as `CREATED`
    Converged,
    /// A converger failed, status recorded as `ERROR`
    Failed,
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::UpToDate => "noop",
            ReconcileOutcome::Converged => "created",
            ReconcileOutcome::Failed => "error",
        }
    }
}

pub struct FleetReconciler {
    deployments: DeploymentConverger,
    services: ServiceConverger,
    status: StatusRecorder,
}

impl FleetReconciler {
    pub fn new(deployments: DeploymentConverger, services: ServiceConverger, status: StatusRecorder) -> Self {
        Self {
            deployments,
            services,
            status,
        }
    }

    /// Runs one attempt for `fleet`.
    ///
    /// Convergence failures end up in the recorded status and are not returned; the only
    /// error surfaced to the caller is a failed status write.
    pub async fn reconcile(&self, fleet: &WorkerFleet) -> Result<ReconcileOutcome, Error> {
        let key = fleet.object_key();
        let mut status = fleet.current_status();

        if !needs_update(&fleet.spec, &status) {
            log::debug!("WorkerFleet {key} is up to date");
            return Ok(ReconcileOutcome::UpToDate);
        }

        log::info!(
            "Reconciling WorkerFleet {key} - replicas: {}, threads: {}, last status: {:?}",
            fleet.spec.replicas, fleet.spec.thread_count, status.phase,
        );

        let outcome = match self.converge(fleet).await {
            Ok(()) => {
                StatusRecorder::on_success(&mut status, &fleet.spec);
                ReconcileOutcome::Converged
            }
            Err(err) => {
                log::error!("Error converging WorkerFleet {key} - {err}");
                StatusRecorder::on_failure(&mut status);
                ReconcileOutcome::Failed
            }
        };

        self.status.persist(fleet, &status).await?;
        Ok(outcome)
    }

    async fn converge(&self, fleet: &WorkerFleet) -> Result<(), Error> {
        self.deployments.converge(fleet).await?;
        self.services.converge(fleet).await?;
        Ok(())
    }
}
