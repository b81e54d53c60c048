use crate::model::spec::{FleetPhase, WorkerFleetSpec, WorkerFleetStatus};

/// Whether the managed objects have to be converged again for `spec`.
///
/// Anything but a `CREATED` status recording exactly the current spec counts as out of date,
/// which makes reconciles of an up to date fleet a no-op no matter how often they are delivered.
pub fn needs_update(spec: &WorkerFleetSpec, status: &WorkerFleetStatus) -> bool {
    status.phase != FleetPhase::Created
        || status.applied_replicas != spec.replicas
        || status.applied_thread_count != spec.thread_count
}
