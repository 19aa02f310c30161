//! Authors service facade.

use reqwest::Method;
use serde::Serialize;
use std::fmt::Display;

use crate::client::ServiceClient;
use crate::error::ClientResult;
use crate::resilience::Payload;

#[derive(Debug, Clone)]
pub struct AuthorsClient {
    inner: ServiceClient,
}

impl AuthorsClient {
    pub const SERVICE: &'static str = "authors";

    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// All authors with their books.
    pub async fn get_all(&self) -> ClientResult<Payload> {
        self.inner.fetch("get_all", "", &[]).await
    }

    pub async fn get_by_id(&self, id: impl Display) -> ClientResult<Payload> {
        self.inner.fetch("get_by_id", "/{}", &[&id.to_string()]).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, author: &T) -> ClientResult<Payload> {
        self.inner.send("create", Method::POST, "", &[], author).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, id: impl Display, author: &T) -> ClientResult<Payload> {
        self.inner
            .send("update", Method::PUT, "/{}", &[&id.to_string()], author)
            .await
    }

    pub async fn delete(&self, id: impl Display) -> ClientResult<Payload> {
        self.inner.remove("delete", "/{}", &[&id.to_string()]).await
    }

    /// Authors of the book with this ISBN.
    ///
    /// The backend fails this lookup intermittently, so it always runs with retry.
    pub async fn get_by_book_isbn(&self, isbn: &str) -> ClientResult<Payload> {
        let op = self
            .inner
            .operation("find_by_book_isbn", Method::GET, "/find/{}", &[isbn])?
            .retry_eligible(true);
        self.inner.call(op).await
    }
}
