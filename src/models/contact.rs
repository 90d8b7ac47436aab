//! Contact model and the directory API's wire shapes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::{ChannelFlags, ChannelSet};

/// Opaque contact identifier assigned by the directory.
///
/// The directory may hand out numeric or string ids; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => ContactId(text),
            RawId::Number(number) => ContactId(number.to_string()),
        })
    }
}

/// A contact record as returned by `GET /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRecord {
    pub id: ContactId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub flags: ChannelFlags,
}

/// Envelope of the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListEnvelope {
    pub data: Vec<ContactRecord>,
}

/// Client-side view of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// `None` until the directory has persisted the contact.
    pub id: Option<ContactId>,
    pub name: String,
    pub phone: String,
    pub notification_channels: ChannelSet,
}

impl Contact {
    /// An empty contact that only exists locally.
    pub fn placeholder() -> Self {
        Self {
            id: None,
            name: String::new(),
            phone: String::new(),
            notification_channels: ChannelSet::new(),
        }
    }
}

impl From<ContactRecord> for Contact {
    fn from(record: ContactRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name.unwrap_or_default(),
            phone: record.phone.unwrap_or_default(),
            notification_channels: ChannelSet::from_flags(record.flags),
        }
    }
}

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub flags: ChannelFlags,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationChannel;
    use serde_json::json;

    #[test]
    fn test_record_folds_flags_into_channels() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [
                {"id": 7, "name": "Bob", "phone": "123",
                 "notify_feishu": true, "notify_sms": false, "notify_phone": true},
                {"id": "abc", "name": "Eve", "phone": null}
            ]
        }))
        .unwrap();

        let contacts: Vec<Contact> = envelope.data.into_iter().map(Contact::from).collect();
        assert_eq!(contacts[0].id, Some(ContactId::new("7")));
        assert!(contacts[0]
            .notification_channels
            .contains(NotificationChannel::InstantMessage));
        assert!(contacts[0]
            .notification_channels
            .contains(NotificationChannel::PhoneCall));
        assert!(!contacts[0].notification_channels.contains(NotificationChannel::Sms));

        assert_eq!(contacts[1].id, Some(ContactId::new("abc")));
        assert_eq!(contacts[1].phone, "");
        assert!(contacts[1].notification_channels.is_empty());
    }

    #[test]
    fn test_integer_and_null_flags_do_not_reject_the_list() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [
                {"id": 1, "name": "Bob", "phone": "1",
                 "notify_feishu": 1, "notify_sms": 0, "notify_phone": null},
                {"id": 2, "name": "Eve", "phone": "2",
                 "notify_feishu": null, "notify_sms": 1, "notify_phone": true}
            ]
        }))
        .unwrap();

        let contacts: Vec<Contact> = envelope.data.into_iter().map(Contact::from).collect();
        let channels = |i: usize| contacts[i].notification_channels.iter().collect::<Vec<_>>();
        assert_eq!(channels(0), vec![NotificationChannel::InstantMessage]);
        assert_eq!(
            channels(1),
            vec![NotificationChannel::Sms, NotificationChannel::PhoneCall]
        );
    }

    #[test]
    fn test_fields_serialize_flat() {
        let fields = ContactFields {
            name: "Alice".to_string(),
            phone: Some("555".to_string()),
            flags: ChannelFlags {
                notify_feishu: false,
                notify_sms: true,
                notify_phone: false,
            },
        };
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({
                "name": "Alice",
                "phone": "555",
                "notify_feishu": false,
                "notify_sms": true,
                "notify_phone": false
            })
        );
    }

    #[test]
    fn test_fields_omit_missing_phone() {
        let fields = ContactFields {
            name: "Alice".to_string(),
            phone: None,
            flags: ChannelFlags::default(),
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert!(value.get("phone").is_none());
    }
}
