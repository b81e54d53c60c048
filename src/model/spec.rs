use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::error::Error;

/// Spec object for WorkerFleet
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[kube(group = "workers.d71.dev", version = "v1", kind = "WorkerFleet", namespaced)]
#[kube(status = "WorkerFleetStatus")]
#[kube(scale = r#"{"specReplicasPath":".spec.replicas", "statusReplicasPath":".status.appliedReplicas"}"#)]
#[kube(printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.phase"}"#)]
#[kube(printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".status.appliedReplicas"}"#)]
#[kube(printcolumn = r#"{"name":"Threads", "type":"integer", "jsonPath":".status.appliedThreadCount"}"#)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFleetSpec {
    #[schemars(range(min = 0))]
    pub replicas: i32,
    #[schemars(range(min = 1))]
    pub thread_count: i32,
}

/// Status object for WorkerFleet
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFleetStatus {
    #[serde(default)]
    pub phase: FleetPhase,
    #[serde(default)]
    pub applied_replicas: i32,
    #[serde(default)]
    pub applied_thread_count: i32,
}

/// Outcome label of the last reconcile attempt
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FleetPhase {
    #[default]
    Unset,
    Created,
    Error,
}

impl WorkerFleet {
    /// Status as recorded on the resource, or the initial `UNSET` status when none was written yet.
    pub fn current_status(&self) -> WorkerFleetStatus {
        self.status.clone().unwrap_or_default()
    }

    pub fn fleet_namespace(&self) -> Result<String, Error> {
        self.namespace()
            .ok_or(Error::MissingObjectKey(".metadata.namespace"))
    }

    /// `namespace/name`, used to key per-resource bookkeeping.
    pub fn object_key(&self) -> String {
        match self.namespace() {
            Some(namespace) => format!("{namespace}/{}", self.name_any()),
            None => self.name_any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use kube::CustomResourceExt;
    use serde_json::json;

    use super::*;

    #[test]
    fn status_is_serialized_in_camel_case_with_screaming_phase() {
        let status = WorkerFleetStatus {
            phase: FleetPhase::Created,
            applied_replicas: 3,
            applied_thread_count: 4,
        };

        let value = serde_json::to_value(&status).expect("Cannot serialize status");
        assert_eq!(value, json!({
            "phase": "CREATED",
            "appliedReplicas": 3,
            "appliedThreadCount": 4,
        }));
    }

    #[test]
    fn partial_status_falls_back_to_defaults() {
        let status: WorkerFleetStatus = serde_json::from_value(json!({ "phase": "ERROR" }))
            .expect("Cannot deserialize status");

        assert_eq!(status.phase, FleetPhase::Error);
        assert_eq!(status.applied_replicas, 0);
        assert_eq!(status.applied_thread_count, 0);
    }

    #[test]
    fn missing_status_reads_as_unset() {
        let fleet = WorkerFleet::new("tally", WorkerFleetSpec { replicas: 1, thread_count: 1 });
        assert_eq!(fleet.current_status().phase, FleetPhase::Unset);
    }

    #[test]
    fn object_key_includes_namespace() {
        let mut fleet = WorkerFleet::new("tally", WorkerFleetSpec { replicas: 1, thread_count: 1 });
        assert_eq!(fleet.object_key(), "tally");
        assert!(matches!(fleet.fleet_namespace(), Err(Error::MissingObjectKey(_))));

        fleet.metadata.namespace = Some(String::from("swatch"));
        assert_eq!(fleet.object_key(), "swatch/tally");
    }

    #[test]
    fn crd_exposes_status_subresource() {
        let crd = WorkerFleet::crd();
        assert_eq!(crd.spec.group, "workers.d71.dev");
        assert_eq!(crd.spec.names.kind, "WorkerFleet");
        let version = &crd.spec.versions[0];
        assert!(version.subresources.as_ref().and_then(|s| s.status.as_ref()).is_some());
    }
}
