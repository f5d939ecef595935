//! HTTP client for the catalog API

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::form::{ItemForm, ProductForm};
use crate::catalog::{Item, Product};

/// Relational item endpoints as seen by a client
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn list_items(&self) -> ClientResult<Vec<Item>>;
    async fn create_item(&self, form: &ItemForm) -> ClientResult<Item>;
    async fn update_item(&self, id: i64, form: &ItemForm) -> ClientResult<Item>;
    async fn delete_item(&self, id: i64) -> ClientResult<()>;
}

/// Document product endpoints as seen by a client
#[async_trait]
pub trait ProductsApi: Send + Sync {
    async fn list_products(&self) -> ClientResult<Vec<Product>>;
    async fn create_product(&self, form: &ProductForm) -> ClientResult<Product>;
    async fn update_product(&self, id: &str, form: &ProductForm) -> ClientResult<Product>;
    async fn delete_product(&self, id: &str) -> ClientResult<()>;
}

/// Client for a running catalog server
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// `base_url` is the server root, e.g. `http://localhost:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the URL of an API resource
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.api_url(path)).send().await?;
        parse(response).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .client
            .post(self.api_url(path))
            .json(body)
            .send()
            .await?;
        parse(response).await
    }

    async fn put<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .client
            .put(self.api_url(path))
            .json(body)
            .send()
            .await?;
        parse(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.client.delete(self.api_url(path)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> ClientResult<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    check_status(response)
        .await?
        .json()
        .await
        .map_err(ClientError::Parse)
}

#[async_trait]
impl ItemsApi for CatalogClient {
    async fn list_items(&self) -> ClientResult<Vec<Item>> {
        self.get("items").await
    }

    async fn create_item(&self, form: &ItemForm) -> ClientResult<Item> {
        self.post("items", form).await
    }

    async fn update_item(&self, id: i64, form: &ItemForm) -> ClientResult<Item> {
        self.put(&format!("items/{}", id), form).await
    }

    async fn delete_item(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("items/{}", id)).await
    }
}

#[async_trait]
impl ProductsApi for CatalogClient {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get("products").await
    }

    async fn create_product(&self, form: &ProductForm) -> ClientResult<Product> {
        self.post("products", form).await
    }

    async fn update_product(&self, id: &str, form: &ProductForm) -> ClientResult<Product> {
        self.put(&format!("products/{}", id), form).await
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("products/{}", id)).await
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
