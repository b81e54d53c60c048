use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use serde::de::DeserializeOwned;

#[cfg(test)]
use mockall::automock;

use crate::model::error::Error;

pub static DEPLOYMENT_TEMPLATE: &str = "worker-deployment.yaml";
pub static SERVICE_TEMPLATE: &str = "worker-service.yaml";

/// Named lookup of raw template definitions
#[cfg_attr(test, automock)]
pub trait TemplateSource: Send + Sync {
    fn read(&self, name: &str) -> Result<String, Error>;
}

/// Templates compiled into the operator binary
pub struct EmbeddedTemplateSource;

impl TemplateSource for EmbeddedTemplateSource {
    fn read(&self, name: &str) -> Result<String, Error> {
        match name {
            n if n == DEPLOYMENT_TEMPLATE => Ok(String::from(include_str!("../../templates/worker-deployment.yaml"))),
            n if n == SERVICE_TEMPLATE => Ok(String::from(include_str!("../../templates/worker-service.yaml"))),
            other => Err(Error::TemplateNotFound(String::from(other))),
        }
    }
}

/// Templates read from a directory on every lookup, so a mounted ConfigMap can be updated in place
pub struct DirTemplateSource {
    root: PathBuf,
}

impl DirTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirTemplateSource {
    fn read(&self, name: &str) -> Result<String, Error> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path)
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => Error::TemplateNotFound(path.display().to_string()),
                _ => Error::TemplateReadFailed {
                    name: path.display().to_string(),
                    source: err,
                },
            })
    }
}

/// Loads the base definitions of the managed Deployment and Service
#[derive(Clone)]
pub struct ResourceTemplateStore {
    source: Arc<dyn TemplateSource>,
}

impl ResourceTemplateStore {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self { source }
    }

    pub fn embedded() -> Self {
        Self::new(Arc::new(EmbeddedTemplateSource))
    }

    pub fn deployment(&self) -> Result<Deployment, Error> {
        self.load(DEPLOYMENT_TEMPLATE)
    }

    pub fn service(&self) -> Result<Service, Error> {
        self.load(SERVICE_TEMPLATE)
    }

    fn load<K: DeserializeOwned>(&self, name: &str) -> Result<K, Error> {
        let raw = self.source.read(name)?;
        serde_yaml::from_str(&raw)
            .map_err(|source| Error::TemplateInvalid {
                name: String::from(name),
                source,
            })
    }
}
