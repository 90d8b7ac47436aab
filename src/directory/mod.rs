//! Remote directory client.
//!
//! `DirectoryApi` is the raw transport seam. `RemoteDirectory` wraps it with the
//! page's failure contract: no error ever reaches the caller, every failure is
//! logged and turned into a sentinel result plus a one-shot toast.

mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpDirectory;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Contact, ContactFields, ContactId, ContactRecord};

/// Raw calls against the contact directory.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<ContactRecord>, AppError>;
    async fn create_user(&self, fields: &ContactFields) -> Result<serde_json::Value, AppError>;
    async fn update_user(&self, id: &ContactId, fields: &ContactFields) -> Result<(), AppError>;
    async fn delete_user(&self, id: &ContactId) -> Result<(), AppError>;
}

pub const LIST_FAILED: &str = "Failed to load contacts";
pub const CREATE_FAILED: &str = "Failed to add contact";
pub const UPDATE_FAILED: &str = "Failed to update contact";
pub const DELETE_FAILED: &str = "Failed to delete contact";

/// A user-visible notification, shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
}

/// Directory client with the swallow-and-notify failure policy.
pub struct RemoteDirectory<A> {
    api: A,
    toasts: Vec<Toast>,
}

impl<A: DirectoryApi> RemoteDirectory<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            toasts: Vec::new(),
        }
    }

    /// All contacts, or an empty list if the directory could not be read.
    pub async fn list(&mut self) -> Vec<Contact> {
        self.fetch().await.unwrap_or_default()
    }

    /// Like `list`, but tells a failed read apart from an empty directory.
    pub async fn fetch(&mut self) -> Option<Vec<Contact>> {
        match self.api.list_users().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Fetched contacts");
                Some(records.into_iter().map(Contact::from).collect())
            }
            Err(e) => {
                tracing::error!(error = %e, "Listing contacts failed");
                self.notify(LIST_FAILED);
                None
            }
        }
    }

    /// Create a contact; returns the directory's response payload.
    pub async fn create(&mut self, fields: &ContactFields) -> Option<serde_json::Value> {
        match self.api.create_user(fields).await {
            Ok(payload) => {
                tracing::info!(name = %fields.name, "Created contact");
                Some(payload)
            }
            Err(e) => {
                tracing::error!(error = %e, "Creating contact failed");
                self.notify(CREATE_FAILED);
                None
            }
        }
    }

    pub async fn update(&mut self, id: &ContactId, fields: &ContactFields) -> bool {
        match self.api.update_user(id, fields).await {
            Ok(()) => {
                tracing::info!(%id, "Updated contact");
                true
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "Updating contact failed");
                self.notify(UPDATE_FAILED);
                false
            }
        }
    }

    pub async fn delete(&mut self, id: &ContactId) -> bool {
        match self.api.delete_user(id).await {
            Ok(()) => {
                tracing::info!(%id, "Deleted contact");
                true
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "Deleting contact failed");
                self.notify(DELETE_FAILED);
                false
            }
        }
    }

    /// Drain pending toasts.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    fn notify(&mut self, message: &str) {
        self.toasts.push(Toast {
            message: message.to_string(),
        });
    }
}
