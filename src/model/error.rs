use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Template {0} not found")]
    TemplateNotFound(String),
    #[error("Failed to read template {name}: {source}")]
    TemplateReadFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Template {name} is not a valid definition: {source}")]
    TemplateInvalid {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to read {kind} {name}: {source}")]
    ObjectReadFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("Failed to patch {kind} {name}: {source}")]
    ObjectPatchFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("Failed to create or replace {kind} {name}: {source}")]
    ObjectCreateFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("Failed to update status of {name}: {source}")]
    StatusUpdateFailed {
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("{0} timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("MissingObjectKey: {0}")]
    MissingObjectKey(&'static str),
}
