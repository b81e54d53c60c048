use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

use crate::core::config::PatchFallback;
use crate::model::error::Error;

/// Result of patching an object that is expected to exist already
#[derive(Debug)]
pub enum PatchOutcome<K> {
    Patched(K),
    NotFound,
    Failed(Error),
}

/// Read/patch/create capability over one namespaced object kind.
///
/// Converging code depends on this trait only, so tests can swap the cluster for a mock.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectApi<K: Send + Sync + 'static>: Send + Sync {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, Error>;

    /// Patch the object named by `object`'s metadata; a missing object is reported as `NotFound`.
    async fn patch(&self, object: &K) -> PatchOutcome<K>;

    /// Create the object, or replace it as a whole when it already exists.
    async fn create_or_replace(&self, object: &K) -> Result<K, Error>;
}

/// Patch `object`, creating it instead when the patch reports it missing.
///
/// With [`PatchFallback::AnyError`] every patch failure gets the create-or-replace fallback.
pub async fn patch_or_create<K>(api: &dyn ObjectApi<K>, object: &K, fallback: PatchFallback) -> Result<K, Error>
    where K: Resource<DynamicType = ()> + Send + Sync + 'static,
{
    let kind = K::kind(&());
    let name = object.name_any();

    match api.patch(object).await {
        PatchOutcome::Patched(patched) => {
            log::debug!("{kind} {name} patched");
            Ok(patched)
        }
        PatchOutcome::NotFound => {
            log::info!("{kind} {name} not found, creating it");
            api.create_or_replace(object).await
        }
        PatchOutcome::Failed(err) if fallback == PatchFallback::AnyError => {
            log::warn!("Patch of {kind} {name} failed, replacing it - {err}");
            api.create_or_replace(object).await
        }
        PatchOutcome::Failed(err) => Err(err),
    }
}

/// [`ObjectApi`] backed by the Kubernetes API server
pub struct KubeObjectApi<K> {
    client: Client,
    field_manager: String,
    timeout: Duration,
    _kind: PhantomData<fn() -> K>,
}

impl<K> KubeObjectApi<K>
    where K: Resource<Scope = NamespaceResourceScope, DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(client: Client, field_manager: &str, timeout: Duration) -> Self {
        Self {
            client,
            field_manager: String::from(field_manager),
            timeout,
            _kind: PhantomData,
        }
    }

    fn api(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }

    fn target(object: &K) -> Result<(String, String), Error> {
        let namespace = object.namespace()
            .ok_or(Error::MissingObjectKey(".metadata.namespace"))?;
        let name = object.meta().name.clone()
            .ok_or(Error::MissingObjectKey(".metadata.name"))?;
        Ok((namespace, name))
    }

    async fn bounded<T, F>(&self, operation: String, fut: F) -> Result<Result<T, kube::Error>, Error>
        where F: Future<Output = Result<T, kube::Error>>,
    {
        tokio::time::timeout(self.timeout, fut).await
            .map_err(|_elapsed| Error::Timeout(operation, self.timeout))
    }
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}

#[async_trait]
impl<K> ObjectApi<K> for KubeObjectApi<K>
    where K: Resource<Scope = NamespaceResourceScope, DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, Error> {
        let api = self.api(namespace);
        self.bounded(format!("get {} {namespace}/{name}", K::kind(&())), api.get_opt(name)).await?
            .map_err(|source| Error::ObjectReadFailed {
                kind: K::kind(&()).to_string(),
                name: String::from(name),
                source,
            })
    }

    async fn patch(&self, object: &K) -> PatchOutcome<K> {
        let (namespace, name) = match Self::target(object) {
            Ok(target) => target,
            Err(err) => return PatchOutcome::Failed(err),
        };
        let params = PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        let api = self.api(&namespace);
        let res = self.bounded(
            format!("patch {} {namespace}/{name}", K::kind(&())),
            api.patch(&name, &params, &Patch::Merge(object)),
        ).await;

        match res {
            Ok(Ok(patched)) => PatchOutcome::Patched(patched),
            Ok(Err(err)) if is_not_found(&err) => PatchOutcome::NotFound,
            Ok(Err(source)) => PatchOutcome::Failed(Error::ObjectPatchFailed {
                kind: K::kind(&()).to_string(),
                name,
                source,
            }),
            Err(timeout) => PatchOutcome::Failed(timeout),
        }
    }

    async fn create_or_replace(&self, object: &K) -> Result<K, Error> {
        let (namespace, name) = Self::target(object)?;
        let api = self.api(&namespace);
        let params = self.post_params();

        let res = match self.get(&namespace, &name).await? {
            Some(existing) => {
                let mut replacement = object.clone();
                replacement.meta_mut().resource_version = existing.resource_version();
                self.bounded(
                    format!("replace {} {namespace}/{name}", K::kind(&())),
                    api.replace(&name, &params, &replacement),
                ).await?
            }
            None => self.bounded(
                format!("create {} {namespace}/{name}", K::kind(&())),
                api.create(&params, object),
            ).await?,
        };

        res.map_err(|source| Error::ObjectCreateFailed {
            kind: K::kind(&()).to_string(),
            name,
            source,
        })
    }
}
