use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kube::core::ErrorResponse;
use kube::{Resource, ResourceExt};

use worker_fleet_operator::client::{ObjectApi, PatchOutcome, StatusWriter};
use worker_fleet_operator::model::error::Error;
use worker_fleet_operator::model::spec::WorkerFleetStatus;

fn key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// In-memory store of one object kind, counting the calls it receives
pub struct FakeObjects<K> {
    objects: Mutex<HashMap<String, K>>,
    patches: AtomicUsize,
    creates: AtomicUsize,
    forbidden: AtomicBool,
}

impl<K: Clone> FakeObjects<K> {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            patches: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            forbidden: AtomicBool::new(false),
        }
    }

    pub fn stored(&self, namespace: &str, name: &str) -> Option<K> {
        self.objects.lock().unwrap().get(&key(namespace, name)).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn patches(&self) -> usize {
        self.patches.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Rejects every write as an authorization failure while set
    pub fn set_forbidden(&self, forbidden: bool) {
        self.forbidden.store(forbidden, Ordering::SeqCst);
    }

    fn forbidden_error(&self, name: &str) -> Option<Error> {
        self.forbidden.load(Ordering::SeqCst).then(|| Error::ObjectPatchFailed {
            kind: String::from("fake"),
            name: String::from(name),
            source: kube::Error::Api(ErrorResponse {
                status: String::from("Failure"),
                message: format!("{name} is forbidden"),
                reason: String::from("Forbidden"),
                code: 403,
            }),
        })
    }
}

#[async_trait]
impl<K> ObjectApi<K> for FakeObjects<K>
    where K: Resource + Clone + Send + Sync + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, Error> {
        Ok(self.stored(namespace, name))
    }

    async fn patch(&self, object: &K) -> PatchOutcome<K> {
        self.patches.fetch_add(1, Ordering::SeqCst);
        let name = object.name_any();
        if let Some(err) = self.forbidden_error(&name) {
            return PatchOutcome::Failed(err);
        }
        let key = key(&object.namespace().unwrap_or_default(), &name);
        let mut objects = self.objects.lock().unwrap();
        match objects.get_mut(&key) {
            Some(current) => {
                *current = object.clone();
                PatchOutcome::Patched(object.clone())
            }
            None => PatchOutcome::NotFound,
        }
    }

    async fn create_or_replace(&self, object: &K) -> Result<K, Error> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let name = object.name_any();
        if let Some(err) = self.forbidden_error(&name) {
            return Err(err);
        }
        let key = key(&object.namespace().unwrap_or_default(), &name);
        self.objects.lock().unwrap().insert(key, object.clone());
        Ok(object.clone())
    }
}

/// Status subresources written by the operator, keyed by `namespace/name`
#[derive(Default)]
pub struct FakeStatuses {
    statuses: Mutex<HashMap<String, WorkerFleetStatus>>,
    writes: AtomicUsize,
}

impl FakeStatuses {
    pub fn stored(&self, namespace: &str, name: &str) -> Option<WorkerFleetStatus> {
        self.statuses.lock().unwrap().get(&key(namespace, name)).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusWriter for FakeStatuses {
    async fn patch_status(&self, namespace: &str, name: &str, status: &WorkerFleetStatus) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.statuses.lock().unwrap().insert(key(namespace, name), status.clone());
        Ok(())
    }
}
