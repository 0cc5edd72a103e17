// ABOUTME: The collection/instance pattern shared by every engine resource.
// ABOUTME: Resource maps a kind to its paths and payloads; Collection and Instance dispatch.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::RequestOptions;
use crate::types::Id;
use hyper::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// A server-managed object kind exposed under a REST collection path.
///
/// The associated types are the per-endpoint payload table: a mismatch with
/// the API contract is a type error at the call site.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Singular name used in error messages, e.g. `config`.
    const KIND: &'static str;

    /// Collection path relative to the API root, e.g. `configs`.
    const COLLECTION: &'static str;

    /// Query parameters accepted by `list`.
    type ListQuery: Serialize + Send + Sync;

    /// Desired-state document sent by `create` and `update`.
    type Spec: Serialize + Send + Sync;

    /// Query parameters required by `update`, usually the current version.
    type UpdateQuery: Serialize + Send + Sync;

    /// Response of `create`.
    type Created: DeserializeOwned + Send;

    /// The server-assigned identity, if this document carries one.
    fn id(&self) -> Option<&Id<Self>>;

    /// Bind this entity's identity to a client for instance operations.
    fn bind(&self, client: &Client) -> Result<Instance<Self>> {
        Collection::new(client.clone()).instance(self)
    }
}

/// Collection-level operations for one resource kind.
pub struct Collection<R> {
    client: Client,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for Collection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("type", &std::any::type_name::<R>())
            .field("client", &self.client)
            .finish()
    }
}

impl<R: Resource> Collection<R> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// `GET {collection}`
    pub async fn list(&self, query: Option<&R::ListQuery>) -> Result<Vec<R>> {
        let mut options = RequestOptions::new();
        if let Some(query) = query {
            options = options.query_from(query)?;
        }
        self.client
            .json_endpoint(Method::GET, R::COLLECTION, options)
            .await
    }

    /// `POST {collection}/create`
    pub async fn create(&self, spec: &R::Spec) -> Result<R::Created> {
        let options = RequestOptions::new().json(spec)?;
        self.client
            .json_endpoint(Method::POST, &format!("{}/create", R::COLLECTION), options)
            .await
    }

    /// `GET {collection}/{id}`
    pub async fn inspect(&self, id: &Id<R>) -> Result<R> {
        self.client
            .json_endpoint(Method::GET, &Self::item_path(id)?, RequestOptions::new())
            .await
    }

    /// `DELETE {collection}/{id}`
    pub async fn delete(&self, id: &Id<R>) -> Result<()> {
        self.client
            .json_endpoint(Method::DELETE, &Self::item_path(id)?, RequestOptions::new())
            .await
    }

    /// `POST {collection}/{id}/update`
    pub async fn update(&self, id: &Id<R>, query: &R::UpdateQuery, spec: &R::Spec) -> Result<()> {
        let path = format!("{}/update", Self::item_path(id)?);
        let options = RequestOptions::new().query_from(query)?.json(spec)?;
        self.client.json_endpoint(Method::POST, &path, options).await
    }

    /// Bind an entity's identity for instance operations.
    ///
    /// Fails with [`Error::MissingIdentity`] when the entity has no ID, before
    /// anything is sent.
    pub fn instance(&self, entity: &R) -> Result<Instance<R>> {
        match entity.id() {
            Some(id) => self.get(id.clone()),
            None => Err(Error::MissingIdentity { kind: R::KIND }),
        }
    }

    /// Bind a known ID for instance operations. An empty ID is rejected.
    pub fn get(&self, id: impl Into<Id<R>>) -> Result<Instance<R>> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::MissingIdentity { kind: R::KIND });
        }
        Ok(Instance {
            collection: self.clone(),
            id,
        })
    }

    /// `{collection}/{id}`. An empty ID would address the collection itself.
    fn item_path(id: &Id<R>) -> Result<String> {
        if id.is_empty() {
            return Err(Error::MissingIdentity { kind: R::KIND });
        }
        Ok(format!("{}/{}", R::COLLECTION, id.path_segment()))
    }
}

/// Identity-bound operations. Each forwards to [`Collection`] with its own ID.
pub struct Instance<R> {
    collection: Collection<R>,
    id: Id<R>,
}

impl<R> Clone for Instance<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            id: self.id.clone(),
        }
    }
}

impl<R> std::fmt::Debug for Instance<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &std::any::type_name::<R>())
            .field("id", &self.id)
            .finish()
    }
}

impl<R: Resource> Instance<R> {
    pub fn id(&self) -> &Id<R> {
        &self.id
    }

    pub async fn inspect(&self) -> Result<R> {
        self.collection.inspect(&self.id).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.collection.delete(&self.id).await
    }

    pub async fn update(&self, query: &R::UpdateQuery, spec: &R::Spec) -> Result<()> {
        self.collection.update(&self.id, query, spec).await
    }
}
