//! Per-row edit state.
//!
//! A row is either showing static text (`View`) or inline form controls
//! (`Edit`). Rows the directory has not persisted yet are drafts; they start in
//! `Edit` and carry a locally generated key instead of a contact id.

use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::models::{Contact, ContactId};

const DRAFT_PREFIX: &str = "draft-";

/// Identifies a row within the page, persisted or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Persisted(ContactId),
    Draft(Uuid),
}

impl RowKey {
    /// Inverse of `Display`. Anything that is not a draft key is taken as a
    /// contact id.
    pub fn parse(raw: &str) -> Self {
        raw.strip_prefix(DRAFT_PREFIX)
            .and_then(|rest| Uuid::parse_str(rest).ok())
            .map(RowKey::Draft)
            .unwrap_or_else(|| RowKey::Persisted(ContactId::new(raw)))
    }

    pub fn contact_id(&self) -> Option<&ContactId> {
        match self {
            RowKey::Persisted(id) => Some(id),
            RowKey::Draft(_) => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, RowKey::Draft(_))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Persisted(id) => write!(f, "{}", id),
            RowKey::Draft(uuid) => write!(f, "{}{}", DRAFT_PREFIX, uuid),
        }
    }
}

impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMode {
    View,
    Edit,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub key: RowKey,
    pub contact: Contact,
    pub mode: RowMode,
}

impl Row {
    /// Row hydrated from the directory. Always starts in `View`.
    pub fn from_server(contact: Contact) -> Self {
        let key = match &contact.id {
            Some(id) => RowKey::Persisted(id.clone()),
            None => RowKey::Draft(Uuid::new_v4()),
        };
        Self {
            key,
            contact,
            mode: RowMode::View,
        }
    }

    /// Fresh local placeholder, editable right away.
    pub fn draft() -> Self {
        Self {
            key: RowKey::Draft(Uuid::new_v4()),
            contact: Contact::placeholder(),
            mode: RowMode::Edit,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode == RowMode::Edit
    }

    /// `View -> Edit`. No-op for rows already editing.
    pub fn begin_edit(&mut self) {
        self.mode = RowMode::Edit;
    }

    /// `Edit -> View` for persisted rows. Returns `false` for drafts, which
    /// have no view state to fall back to and must be dropped by the owner.
    pub fn cancel_edit(&mut self) -> bool {
        if self.key.is_draft() {
            return false;
        }
        self.mode = RowMode::View;
        true
    }
}
