use std::sync::Arc;

use kube::runtime::controller::Action;

use crate::model::context::ContextData;
use crate::model::error::Error;
use crate::model::spec::WorkerFleet;

/// an error handler that will be called when the reconciler fails with access to both the
/// object that caused the failure and the actual error
pub fn error_policy(fleet: Arc<WorkerFleet>, error: &Error, ctx: Arc<ContextData>) -> Action {
    let key = fleet.object_key();
    let delay = ctx.retries.record_failure(&key);
    log::warn!("Reconciliation of WorkerFleet {key} failed, retrying in {delay:?} - {error}");
    Action::requeue(delay)
}
