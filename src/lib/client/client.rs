use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::core::{Ack, Todo, TodoPage};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub reconnect_interval: Duration,
    pub max_retries: u32,
}

/// HTTP client for the todo API.
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Polls the health endpoint until the server answers or retries run out.
    pub async fn connect_with_retry(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Self::new(config.base_url.clone());
        let mut retries = config.max_retries;
        loop {
            match client.health().await {
                Ok(()) => return Ok(client),
                Err(e) => {
                    if retries == 0 {
                        return Err(e);
                    }
                    retries -= 1;
                    tokio::time::sleep(config.reconnect_interval).await;
                }
            }
        }
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<TodoPage, ClientError> {
        let resp = self
            .http
            .get(format!(
                "{}/api/todos?page={}&limit={}",
                self.base_url, page, limit
            ))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<Todo, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/todos/{}", self.base_url, id))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<Todo, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/todos", self.base_url))
            .json(&json!({ "title": title, "description": description }))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn update(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Todo, ClientError> {
        let resp = self
            .http
            .put(format!("{}/api/todos/{}", self.base_url, id))
            .json(&json!({ "title": title, "description": description }))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn delete(&self, id: &str) -> Result<Ack, ClientError> {
        let resp = self
            .http
            .delete(format!("{}/api/todos/{}", self.base_url, id))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// Success bodies deserialize into `T`; everything else carries
    /// `{message}` which becomes an `Api` error.
    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let message = resp
            .json::<Ack>()
            .await
            .map(|ack| ack.message)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
