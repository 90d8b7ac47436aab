//! In-memory directory used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::DirectoryApi;
use crate::errors::AppError;
use crate::models::{ChannelFlags, ContactFields, ContactId, ContactRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(ContactFields),
    Update(ContactId, ContactFields),
    Delete(ContactId),
}

#[derive(Default)]
struct FakeState {
    records: Vec<ContactRecord>,
    calls: Vec<Call>,
    next_id: u64,
    fail_list: bool,
    fail_writes: bool,
}

/// Cloneable handle; clones share state so tests can inspect calls made
/// through a `RemoteDirectory` that owns another clone.
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().next_id = 100;
        fake
    }

    pub fn seed(&self, id: &str, name: &str, flags: (bool, bool, bool)) {
        self.state.lock().unwrap().records.push(ContactRecord {
            id: ContactId::new(id),
            name: Some(name.to_string()),
            phone: Some(format!("{}-phone", name)),
            flags: ChannelFlags {
                notify_feishu: flags.0,
                notify_sms: flags.1,
                notify_phone: flags.2,
            },
        });
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than `List`.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::List)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectory {
    async fn list_users(&self) -> Result<Vec<ContactRecord>, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);
        if state.fail_list {
            return Err(AppError::Transport("connection refused".into()));
        }
        Ok(state.records.clone())
    }

    async fn create_user(&self, fields: &ContactFields) -> Result<serde_json::Value, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(fields.clone()));
        if state.fail_writes {
            return Err(AppError::UpstreamStatus {
                status: 500,
                message: "write rejected".into(),
            });
        }
        state.next_id += 1;
        let id = ContactId::new(state.next_id.to_string());
        state.records.push(ContactRecord {
            id: id.clone(),
            name: Some(fields.name.clone()),
            phone: fields.phone.clone(),
            flags: fields.flags,
        });
        Ok(serde_json::json!({ "data": { "id": id } }))
    }

    async fn update_user(&self, id: &ContactId, fields: &ContactFields) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update(id.clone(), fields.clone()));
        if state.fail_writes {
            return Err(AppError::Transport("connection reset".into()));
        }
        let record = state
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Contact {} not found", id)))?;
        record.name = Some(fields.name.clone());
        if fields.phone.is_some() {
            record.phone = fields.phone.clone();
        }
        record.flags = fields.flags;
        Ok(())
    }

    async fn delete_user(&self, id: &ContactId) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(id.clone()));
        if state.fail_writes {
            return Err(AppError::Transport("connection reset".into()));
        }
        state.records.retain(|r| &r.id != id);
        Ok(())
    }
}
