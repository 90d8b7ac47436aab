//! The contact list state container.
//!
//! `ContactList` owns the only copy of the page's rows. Edit-state actions are
//! local; `save` and `delete` go through the directory and then replace the
//! whole collection with a fresh read.

use serde::Serialize;

use crate::directory::{DirectoryApi, RemoteDirectory, Toast};
use crate::form::{FieldErrors, FormState};
use crate::models::{Contact, ContactId};
use crate::rows::{Row, RowKey, RowMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    Loading,
    Ready,
}

/// Result of a save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No row with that key.
    NotFound,
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The directory accepted the write.
    Saved,
    /// The directory rejected the write or could not be reached.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowSnapshot {
    pub key: RowKey,
    #[serde(flatten)]
    pub contact: Contact,
    pub mode: RowMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Serializable view of the page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub phase: PagePhase,
    pub rows: Vec<RowSnapshot>,
}

pub struct ContactList<A> {
    directory: RemoteDirectory<A>,
    rows: Vec<Row>,
    form: FormState,
    phase: PagePhase,
}

impl<A: DirectoryApi> ContactList<A> {
    pub fn new(api: A) -> Self {
        Self {
            directory: RemoteDirectory::new(api),
            rows: Vec::new(),
            form: FormState::new(),
            phase: PagePhase::Loading,
        }
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Initial mount: one list call, then `Ready`.
    pub async fn load(&mut self) {
        let contacts = self.directory.list().await;
        self.replace_rows(contacts);
        self.phase = PagePhase::Ready;
        tracing::info!(rows = self.rows.len(), "Contact list ready");
    }

    /// Append an empty editable row. No network.
    pub fn add(&mut self) -> RowKey {
        let row = Row::draft();
        self.form.seed(&row);
        let key = row.key.clone();
        self.rows.push(row);
        tracing::debug!(%key, "Added draft row");
        key
    }

    /// Switch a row into edit mode and seed its form fields.
    pub fn edit(&mut self, key: &RowKey) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| &row.key == key) else {
            return false;
        };
        if !row.is_editing() || !self.form.is_bound(key) {
            row.begin_edit();
            self.form.seed(row);
        }
        true
    }

    /// Leave edit mode without saving. Drafts are dropped.
    pub fn cancel(&mut self, key: &RowKey) -> bool {
        let Some(index) = self.rows.iter().position(|row| &row.key == key) else {
            return false;
        };
        if !self.rows[index].cancel_edit() {
            self.rows.remove(index);
        }
        self.form.forget(key);
        true
    }

    /// Apply submitted form values; see `FormState::apply_submission`.
    pub fn input(&mut self, pairs: &[(String, String)]) {
        self.form.apply_submission(pairs);
    }

    /// Validate, write through the directory, then refresh regardless of the
    /// write's outcome.
    pub async fn save(&mut self, key: &RowKey) -> SaveOutcome {
        if !self.rows.iter().any(|row| &row.key == key) {
            return SaveOutcome::NotFound;
        }

        let fields = match self.form.read(key) {
            Ok(fields) => fields,
            Err(errors) => {
                tracing::debug!(%key, %errors, "Validation failed");
                return SaveOutcome::Invalid(errors);
            }
        };

        let written = match key.contact_id() {
            Some(id) => self.directory.update(id, &fields).await,
            None => self.directory.create(&fields).await.is_some(),
        };

        self.refresh().await;

        if written {
            SaveOutcome::Saved
        } else {
            SaveOutcome::Failed
        }
    }

    /// Delete through the directory. The collection is only refreshed when
    /// the delete succeeded.
    pub async fn delete(&mut self, id: &ContactId) -> bool {
        if !self.directory.delete(id).await {
            return false;
        }
        self.refresh().await;
        true
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.directory.take_toasts()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            phase: self.phase,
            rows: self
                .rows
                .iter()
                .map(|row| RowSnapshot {
                    key: row.key.clone(),
                    contact: row.contact.clone(),
                    mode: row.mode,
                    errors: self.form.errors(&row.key).cloned(),
                })
                .collect(),
        }
    }

    /// Replace every row with the directory's current contents. A failed read
    /// keeps the rows on screen; the directory has already queued a toast.
    async fn refresh(&mut self) -> bool {
        match self.directory.fetch().await {
            Some(contacts) => {
                self.replace_rows(contacts);
                true
            }
            None => {
                tracing::warn!("Refresh failed, keeping previous rows");
                false
            }
        }
    }

    fn replace_rows(&mut self, contacts: Vec<Contact>) {
        self.rows = contacts.into_iter().map(Row::from_server).collect();
        self.form.clear();
    }
}
