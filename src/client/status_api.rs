use std::time::Duration;

use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::Client;
use serde_json::json;

#[cfg(test)]
use mockall::automock;

use crate::model::error::Error;
use crate::model::spec::{WorkerFleet, WorkerFleetStatus};

/// Writes the status subresource of a WorkerFleet, never touching its spec
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusWriter: Send + Sync {
    async fn patch_status(&self, namespace: &str, name: &str, status: &WorkerFleetStatus) -> Result<(), Error>;
}

pub struct KubeStatusWriter {
    client: Client,
    field_manager: String,
    timeout: Duration,
}

impl KubeStatusWriter {
    pub fn new(client: Client, field_manager: &str, timeout: Duration) -> Self {
        Self {
            client,
            field_manager: String::from(field_manager),
            timeout,
        }
    }
}

#[async_trait]
impl StatusWriter for KubeStatusWriter {
    async fn patch_status(&self, namespace: &str, name: &str, status: &WorkerFleetStatus) -> Result<(), Error> {
        let fleets: Api<WorkerFleet> = Api::namespaced(self.client.clone(), namespace);
        let update_status = json!({
            "status": status
        });
        let params = PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };

        tokio::time::timeout(self.timeout, fleets.patch_status(name, &params, &Patch::Merge(&update_status)))
            .await
            .map_err(|_elapsed| Error::Timeout(format!("status update of {namespace}/{name}"), self.timeout))?
            .map_err(|source| Error::StatusUpdateFailed {
                name: String::from(name),
                source,
            })?;

        Ok(())
    }
}
