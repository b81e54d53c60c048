use std::sync::Arc;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Container, EnvVar};
use kube::ResourceExt;

use crate::client::{patch_or_create, ObjectApi};
use crate::core::config::PatchFallback;
use crate::model::error::Error;
use crate::model::spec::WorkerFleet;
use crate::service::template_svc::ResourceTemplateStore;
use crate::service::{insert_fleet_label, stamp_identity};

/// Environment variable carrying the per-pod consumer thread count
pub static THREAD_COUNT_ENV: &str = "KAFKA_MESSAGE_THREADS";

pub struct DeploymentConverger {
    templates: ResourceTemplateStore,
    deployments: Arc<dyn ObjectApi<Deployment>>,
    fallback: PatchFallback,
}

impl DeploymentConverger {
    pub fn new(templates: ResourceTemplateStore, deployments: Arc<dyn ObjectApi<Deployment>>, fallback: PatchFallback) -> Self {
        Self {
            templates,
            deployments,
            fallback,
        }
    }

    /// Builds the desired Deployment for `fleet` out of the base template.
    pub fn render(&self, fleet: &WorkerFleet) -> Result<Deployment, Error> {
        let mut deployment = self.templates.deployment()?;
        let name = fleet.name_any();
        let namespace = fleet.fleet_namespace()?;

        stamp_identity(&mut deployment.metadata, &name, &namespace);

        let spec = deployment.spec.get_or_insert_with(Default::default);
        spec.replicas = Some(fleet.spec.replicas);
        insert_fleet_label(&mut spec.selector.match_labels, &name);
        insert_fleet_label(&mut spec.template.metadata.get_or_insert_with(Default::default).labels, &name);

        let thread_count = fleet.spec.thread_count.to_string();
        for container in spec.template.spec.iter_mut().flat_map(|pod| pod.containers.iter_mut()) {
            set_env(container, THREAD_COUNT_ENV, &thread_count);
        }

        Ok(deployment)
    }

    pub async fn converge(&self, fleet: &WorkerFleet) -> Result<Deployment, Error> {
        let deployment = self.render(fleet)?;
        log::debug!(
            "Converging deployment {} to {} replicas, {} threads",
            fleet.object_key(), fleet.spec.replicas, fleet.spec.thread_count,
        );
        patch_or_create(self.deployments.as_ref(), &deployment, self.fallback).await
    }
}

/// Appends `name=value` to the container env, overwriting an entry with the same name if present.
fn set_env(container: &mut Container, name: &str, value: &str) {
    let env = container.env.get_or_insert_with(Vec::new);
    match env.iter_mut().find(|var| var.name == name) {
        Some(var) => {
            var.value = Some(String::from(value));
            var.value_from = None;
        }
        None => env.push(EnvVar {
            name: String::from(name),
            value: Some(String::from(value)),
            value_from: None,
        }),
    }
}
