//! `reqwest` implementation of the directory API.

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::DirectoryApi;
use crate::errors::AppError;
use crate::models::{ContactFields, ContactId, ContactRecord, ListEnvelope};

/// Talks to `{base_url}/api/users`.
#[derive(Clone)]
pub struct HttpDirectory {
    http: Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn users_url(&self) -> Result<Url, AppError> {
        Url::parse(&format!("{}/api/users", self.base_url))
            .map_err(|e| AppError::Config(format!("Invalid directory URL: {}", e)))
    }

    fn user_url(&self, id: &ContactId) -> Result<Url, AppError> {
        let mut url = self.users_url()?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config("Directory URL cannot be a base".to_string()))?
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectory {
    async fn list_users(&self) -> Result<Vec<ContactRecord>, AppError> {
        let res = self
            .http
            .get(self.users_url()?)
            .send()
            .await?
            .error_for_status()?;
        let envelope: ListEnvelope = res.json().await?;
        Ok(envelope.data)
    }

    async fn create_user(&self, fields: &ContactFields) -> Result<serde_json::Value, AppError> {
        let res = self
            .http
            .post(self.users_url()?)
            .json(fields)
            .send()
            .await?
            .error_for_status()?;
        let body = res.bytes().await?;
        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn update_user(&self, id: &ContactId, fields: &ContactFields) -> Result<(), AppError> {
        self.http
            .put(self.user_url(id)?)
            .json(fields)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_user(&self, id: &ContactId) -> Result<(), AppError> {
        self.http
            .delete(self.user_url(id)?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
