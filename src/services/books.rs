//! Books service facade.

use reqwest::Method;
use serde::Serialize;

use crate::client::ServiceClient;
use crate::error::ClientResult;
use crate::resilience::Payload;

#[derive(Debug, Clone)]
pub struct BooksClient {
    inner: ServiceClient,
}

impl BooksClient {
    pub const SERVICE: &'static str = "books";

    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn get_all(&self) -> ClientResult<Payload> {
        self.inner.fetch("get_all", "", &[]).await
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> ClientResult<Payload> {
        self.inner.fetch("get_by_isbn", "/{}", &[isbn]).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, book: &T) -> ClientResult<Payload> {
        self.inner.send("create", Method::POST, "", &[], book).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, isbn: &str, book: &T) -> ClientResult<Payload> {
        self.inner.send("update", Method::PUT, "/{}", &[isbn], book).await
    }

    pub async fn delete(&self, isbn: &str) -> ClientResult<Payload> {
        self.inner.remove("delete", "/{}", &[isbn]).await
    }

    /// Same lookup as [`get_by_isbn`](Self::get_by_isbn), with retry.
    pub async fn get_by_isbn_with_retry(&self, isbn: &str) -> ClientResult<Payload> {
        let op = self
            .inner
            .operation("get_by_isbn_with_retry", Method::GET, "/{}", &[isbn])?
            .retry_eligible(true);
        self.inner.call(op).await
    }
}
