//! Customers service facade.

use reqwest::Method;
use serde::Serialize;
use std::fmt::Display;

use crate::client::ServiceClient;
use crate::error::ClientResult;
use crate::resilience::Payload;

#[derive(Debug, Clone)]
pub struct CustomersClient {
    inner: ServiceClient,
}

impl CustomersClient {
    pub const SERVICE: &'static str = "customers";

    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn get_all(&self) -> ClientResult<Payload> {
        self.inner.fetch("get_all", "", &[]).await
    }

    pub async fn get_by_id(&self, id: impl Display) -> ClientResult<Payload> {
        self.inner.fetch("get_by_id", "/{}", &[&id.to_string()]).await
    }

    pub async fn get_by_email(&self, email: &str) -> ClientResult<Payload> {
        self.inner.fetch("get_by_email", "/by-email/{}", &[email]).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, customer: &T) -> ClientResult<Payload> {
        self.inner.send("create", Method::POST, "", &[], customer).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, id: impl Display, customer: &T) -> ClientResult<Payload> {
        self.inner
            .send("update", Method::PUT, "/{}", &[&id.to_string()], customer)
            .await
    }

    pub async fn delete(&self, id: impl Display) -> ClientResult<Payload> {
        self.inner.remove("delete", "/{}", &[&id.to_string()]).await
    }
}
