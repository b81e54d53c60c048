use std::sync::Arc;

use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;

use crate::client::{patch_or_create, ObjectApi};
use crate::core::config::PatchFallback;
use crate::model::error::Error;
use crate::model::spec::WorkerFleet;
use crate::service::template_svc::ResourceTemplateStore;
use crate::service::{insert_fleet_label, stamp_identity};

/// Keeps the Service exposing a fleet in the shape of the service template.
pub struct ServiceConverger {
    templates: ResourceTemplateStore,
    services: Arc<dyn ObjectApi<Service>>,
    fallback: PatchFallback,
}

impl ServiceConverger {
    pub fn new(templates: ResourceTemplateStore, services: Arc<dyn ObjectApi<Service>>, fallback: PatchFallback) -> Self {
        Self {
            templates,
            services,
            fallback,
        }
    }

    pub fn render(&self, fleet: &WorkerFleet) -> Result<Service, Error> {
        let mut service = self.templates.service()?;
        let name = fleet.name_any();
        let namespace = fleet.fleet_namespace()?;

        stamp_identity(&mut service.metadata, &name, &namespace);
        if let Some(spec) = service.spec.as_mut() {
            insert_fleet_label(&mut spec.selector, &name);
        }

        Ok(service)
    }

    pub async fn converge(&self, fleet: &WorkerFleet) -> Result<Service, Error> {
        let service = self.render(fleet)?;
        patch_or_create(self.services.as_ref(), &service, self.fallback).await
    }
}
