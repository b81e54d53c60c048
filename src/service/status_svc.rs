use std::sync::Arc;

use kube::ResourceExt;

use crate::client::StatusWriter;
use crate::model::error::Error;
use crate::model::spec::{FleetPhase, WorkerFleet, WorkerFleetSpec, WorkerFleetStatus};

pub struct StatusRecorder {
    writer: Arc<dyn StatusWriter>,
}

impl StatusRecorder {
    pub fn new(writer: Arc<dyn StatusWriter>) -> Self {
        Self { writer }
    }

    pub fn on_success(status: &mut WorkerFleetStatus, spec: &WorkerFleetSpec) {
        status.phase = FleetPhase::Created;
        status.applied_replicas = spec.replicas;
        status.applied_thread_count = spec.thread_count;
    }

    /// Marks the attempt as failed. Applied values stay at the last successful ones, so the
    /// next event finds the fleet out of date again.
    pub fn on_failure(status: &mut WorkerFleetStatus) {
        status.phase = FleetPhase::Error;
    }

    pub async fn persist(&self, fleet: &WorkerFleet, status: &WorkerFleetStatus) -> Result<(), Error> {
        let namespace = fleet.fleet_namespace()?;
        self.writer.patch_status(&namespace, &fleet.name_any(), status).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::status_api::MockStatusWriter;

    use super::*;

    #[test]
    fn success_records_applied_spec() {
        let mut status = WorkerFleetStatus::default();
        StatusRecorder::on_success(&mut status, &WorkerFleetSpec { replicas: 3, thread_count: 4 });

        assert_eq!(status, WorkerFleetStatus {
            phase: FleetPhase::Created,
            applied_replicas: 3,
            applied_thread_count: 4,
        });
    }

    #[test]
    fn failure_keeps_applied_values() {
        let mut status = WorkerFleetStatus {
            phase: FleetPhase::Created,
            applied_replicas: 3,
            applied_thread_count: 4,
        };
        StatusRecorder::on_failure(&mut status);

        assert_eq!(status.phase, FleetPhase::Error);
        assert_eq!(status.applied_replicas, 3);
        assert_eq!(status.applied_thread_count, 4);
    }

    #[tokio::test]
    async fn persist_targets_fleet_status() {
        let mut writer = MockStatusWriter::new();
        writer.expect_patch_status()
            .withf(|namespace, name, status| namespace == "swatch" && name == "tally" && status.phase == FleetPhase::Error)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut fleet = WorkerFleet::new("tally", WorkerFleetSpec { replicas: 1, thread_count: 1 });
        fleet.metadata.namespace = Some(String::from("swatch"));
        let status = WorkerFleetStatus {
            phase: FleetPhase::Error,
            ..Default::default()
        };

        StatusRecorder::new(Arc::new(writer)).persist(&fleet, &status).await
            .expect("Persist status");
    }
}
