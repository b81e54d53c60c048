use std::sync::Arc;
use std::time::Instant;

use kube::runtime::controller::Action;
use kube::Resource;

use crate::model::context::ContextData;
use crate::model::error::Error;
use crate::model::spec::WorkerFleet;
use crate::service::reconciler_svc::ReconcileOutcome;

pub static RECONCILE_TOTAL_METRIC_NAME: &str = "worker_fleet_reconciles_total";
pub static RECONCILE_DURATION_METRIC_NAME: &str = "worker_fleet_reconcile_duration_seconds";

/// The reconciler that will be called when a WorkerFleet changes or its requeue delay expires
pub async fn reconcile(fleet: Arc<WorkerFleet>, ctx: Arc<ContextData>) -> Result<Action, Error> {
    let key = fleet.object_key();

    // Deleted fleets are let go, managed objects are not cleaned up
    if fleet.meta().deletion_timestamp.is_some() {
        log::debug!("WorkerFleet {key} is being deleted");
        ctx.retries.record_success(&key);
        return Ok(Action::await_change());
    }

    let started = Instant::now();
    let outcome = ctx.reconciler.reconcile(&fleet).await?;
    metrics::histogram!(RECONCILE_DURATION_METRIC_NAME).record(started.elapsed().as_secs_f64());
    metrics::counter!(RECONCILE_TOTAL_METRIC_NAME, "outcome" => outcome.as_str()).increment(1);

    match outcome {
        ReconcileOutcome::UpToDate | ReconcileOutcome::Converged => {
            ctx.retries.record_success(&key);
            Ok(Action::requeue(ctx.resync_interval))
        }
        ReconcileOutcome::Failed => {
            let delay = ctx.retries.record_failure(&key);
            log::info!("WorkerFleet {key} in error, next attempt in {delay:?}");
            Ok(Action::requeue(delay))
        }
    }
}
