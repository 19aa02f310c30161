//! Inventory service facade. Stock records are keyed by ISBN.

use reqwest::Method;
use serde::Serialize;

use crate::client::ServiceClient;
use crate::error::ClientResult;
use crate::resilience::Payload;

#[derive(Debug, Clone)]
pub struct InventoryClient {
    inner: ServiceClient,
}

impl InventoryClient {
    pub const SERVICE: &'static str = "inventory";

    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn get_all(&self) -> ClientResult<Payload> {
        self.inner.fetch("get_all", "", &[]).await
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> ClientResult<Payload> {
        self.inner.fetch("get_by_isbn", "/{}", &[isbn]).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, item: &T) -> ClientResult<Payload> {
        self.inner.send("create", Method::POST, "", &[], item).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, isbn: &str, item: &T) -> ClientResult<Payload> {
        self.inner.send("update", Method::PUT, "/{}", &[isbn], item).await
    }

    pub async fn delete(&self, isbn: &str) -> ClientResult<Payload> {
        self.inner.remove("delete", "/{}", &[isbn]).await
    }
}
