//! Orders service facade (customer orders).

use reqwest::Method;
use serde::Serialize;
use std::fmt::Display;

use crate::client::ServiceClient;
use crate::error::ClientResult;
use crate::resilience::Payload;

#[derive(Debug, Clone)]
pub struct OrdersClient {
    inner: ServiceClient,
}

impl OrdersClient {
    pub const SERVICE: &'static str = "orders";

    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn get_all(&self) -> ClientResult<Payload> {
        self.inner.fetch("get_all", "", &[]).await
    }

    /// Every order placed by one customer.
    pub async fn get_all_by_customer_id(&self, customer_id: impl Display) -> ClientResult<Payload> {
        self.inner
            .fetch("get_all_by_customer_id", "/customer/{}", &[&customer_id.to_string()])
            .await
    }

    pub async fn get_by_id(&self, order_id: impl Display) -> ClientResult<Payload> {
        self.inner.fetch("get_by_id", "/{}", &[&order_id.to_string()]).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, order: &T) -> ClientResult<Payload> {
        self.inner.send("create", Method::POST, "", &[], order).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, order_id: impl Display, order: &T) -> ClientResult<Payload> {
        self.inner
            .send("update", Method::PUT, "/{}", &[&order_id.to_string()], order)
            .await
    }

    pub async fn delete(&self, order_id: impl Display) -> ClientResult<Payload> {
        self.inner.remove("delete", "/{}", &[&order_id.to_string()]).await
    }
}
