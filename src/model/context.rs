use std::sync::Arc;
use std::time::Duration;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::Client;

use crate::client::{KubeObjectApi, KubeStatusWriter};
use crate::core::config::OperatorConfig;
use crate::service::deployment_svc::DeploymentConverger;
use crate::service::network_svc::ServiceConverger;
use crate::service::reconciler_svc::FleetReconciler;
use crate::service::retry_svc::RetryTracker;
use crate::service::status_svc::StatusRecorder;
use crate::service::template_svc::{DirTemplateSource, ResourceTemplateStore};

pub struct ContextData {
    /// Converges a single WorkerFleet and records its status
    pub reconciler: FleetReconciler,
    /// Spaces out retries of fleets whose last attempt failed
    pub retries: RetryTracker,
    /// Requeue delay after a successful attempt, acting as the periodic full resync
    pub resync_interval: Duration,
}

impl ContextData {
    pub fn new(reconciler: FleetReconciler, config: &OperatorConfig) -> Self {
        Self {
            reconciler,
            retries: RetryTracker::new(config.retry_base(), config.retry_max()),
            resync_interval: config.resync_interval(),
        }
    }

    /// Wires the reconciler against the Kubernetes API server.
    pub fn from_client(client: Client, config: &OperatorConfig) -> Self {
        let templates = match &config.templates_dir {
            Some(dir) => {
                log::info!("Loading resource templates from {}", dir.display());
                ResourceTemplateStore::new(Arc::new(DirTemplateSource::new(dir)))
            }
            None => ResourceTemplateStore::embedded(),
        };

        let timeout = config.api_timeout();
        let deployments = Arc::new(KubeObjectApi::<Deployment>::new(client.clone(), &config.field_manager, timeout));
        let services = Arc::new(KubeObjectApi::<Service>::new(client.clone(), &config.field_manager, timeout));
        let status_writer = Arc::new(KubeStatusWriter::new(client, &config.field_manager, timeout));

        let reconciler = FleetReconciler::new(
            DeploymentConverger::new(templates.clone(), deployments, config.patch_fallback),
            ServiceConverger::new(templates, services, config.patch_fallback),
            StatusRecorder::new(status_writer),
        );

        Self::new(reconciler, config)
    }
}
