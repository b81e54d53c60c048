use std::collections::BTreeMap;

use kube::api::ObjectMeta;

pub mod deployment_svc;
pub mod network_svc;
pub mod reconciler_svc;
pub mod retry_svc;
pub mod status_svc;
pub mod template_svc;

pub static LABEL_FLEET_NAME: &str = "worker-fleet";

/// Names a managed object after its fleet and labels it so that fleets sharing a namespace stay apart.
pub(crate) fn stamp_identity(meta: &mut ObjectMeta, name: &str, namespace: &str) {
    meta.name = Some(String::from(name));
    meta.namespace = Some(String::from(namespace));
    insert_fleet_label(&mut meta.labels, name);
}

pub(crate) fn insert_fleet_label(labels: &mut Option<BTreeMap<String, String>>, name: &str) {
    labels
        .get_or_insert_with(BTreeMap::new)
        .insert(String::from(LABEL_FLEET_NAME), String::from(name));
}
