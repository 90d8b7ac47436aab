//! Form binding between editable rows and the directory's flat contact shape.
//!
//! Values are keyed by row and field so several rows can be edited inside one
//! form scope. On the page every input is named `{row_key}_{field}`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::models::{ChannelSet, ContactFields, NotificationChannel};
use crate::rows::{Row, RowKey};

pub const NAME_REQUIRED: &str = "Please enter a name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Phone,
    Channels,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Channels => "channels",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Field::Name),
            "phone" => Some(Field::Phone),
            "channels" => Some(Field::Channels),
            _ => None,
        }
    }
}

/// Input name for a row's field.
pub fn field_name(key: &RowKey, field: Field) -> String {
    format!("{}_{}", key, field.as_str())
}

/// Split an input name back into row key and field. Splits on the last `_`
/// so contact ids may themselves contain underscores.
pub fn parse_field_name(raw: &str) -> Option<(RowKey, Field)> {
    let (key, field) = raw.rsplit_once('_')?;
    if key.is_empty() {
        return None;
    }
    Some((RowKey::parse(key), Field::from_str(field)?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Channels(ChannelSet),
}

/// Field-level validation failures for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Per-row form values and inline errors.
#[derive(Debug, Default)]
pub struct FormState {
    values: HashMap<(RowKey, Field), FieldValue>,
    errors: HashMap<RowKey, FieldErrors>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the row's current values into the form.
    pub fn seed(&mut self, row: &Row) {
        let key = &row.key;
        self.values.insert(
            (key.clone(), Field::Name),
            FieldValue::Text(row.contact.name.clone()),
        );
        self.values.insert(
            (key.clone(), Field::Phone),
            FieldValue::Text(row.contact.phone.clone()),
        );
        self.values.insert(
            (key.clone(), Field::Channels),
            FieldValue::Channels(row.contact.notification_channels),
        );
        self.errors.remove(key);
    }

    pub fn is_bound(&self, key: &RowKey) -> bool {
        self.values.contains_key(&(key.clone(), Field::Name))
    }

    pub fn set_text(&mut self, key: &RowKey, field: Field, value: impl Into<String>) {
        if field == Field::Channels {
            return;
        }
        self.values
            .insert((key.clone(), field), FieldValue::Text(value.into()));
    }

    pub fn set_channels(&mut self, key: &RowKey, channels: ChannelSet) {
        self.values
            .insert((key.clone(), Field::Channels), FieldValue::Channels(channels));
    }

    pub fn text(&self, key: &RowKey, field: Field) -> &str {
        match self.values.get(&(key.clone(), field)) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    pub fn channels(&self, key: &RowKey) -> ChannelSet {
        match self.values.get(&(key.clone(), Field::Channels)) {
            Some(FieldValue::Channels(channels)) => *channels,
            _ => ChannelSet::new(),
        }
    }

    /// Apply a browser form submission.
    ///
    /// Only rows already bound are touched. Checkbox groups send nothing when
    /// every box is unchecked, so the page emits an empty `{key}_channels`
    /// marker; a row whose marker is present has its channels rebuilt from the
    /// submitted values.
    pub fn apply_submission(&mut self, pairs: &[(String, String)]) {
        let mut rebuilt: HashMap<RowKey, ChannelSet> = HashMap::new();

        for (name, value) in pairs {
            let Some((key, field)) = parse_field_name(name) else {
                continue;
            };
            if !self.is_bound(&key) {
                tracing::debug!(field = %name, "Ignoring value for unbound row");
                continue;
            }
            match field {
                Field::Name | Field::Phone => self.set_text(&key, field, value.clone()),
                Field::Channels => {
                    let channels = rebuilt.entry(key).or_default();
                    if value.is_empty() {
                        continue;
                    }
                    match NotificationChannel::from_wire_field(value) {
                        Some(channel) => channels.insert(channel),
                        None => tracing::warn!(value = %value, "Unknown notification channel"),
                    }
                }
            }
        }

        for (key, channels) in rebuilt {
            self.set_channels(&key, channels);
        }
    }

    /// Validate the row's values and convert them into the directory's shape.
    ///
    /// Errors are kept for inline display until the next successful read.
    pub fn read(&mut self, key: &RowKey) -> Result<ContactFields, FieldErrors> {
        let name = self.text(key, Field::Name).to_string();
        let mut errors = FieldErrors::default();
        if name.trim().is_empty() {
            errors.insert(Field::Name, NAME_REQUIRED);
        }
        if !errors.is_empty() {
            self.errors.insert(key.clone(), errors.clone());
            return Err(errors);
        }
        self.errors.remove(key);

        let phone = match self.values.get(&(key.clone(), Field::Phone)) {
            Some(FieldValue::Text(phone)) => Some(phone.clone()),
            _ => None,
        };

        Ok(ContactFields {
            name,
            phone,
            flags: self.channels(key).to_flags(),
        })
    }

    pub fn errors(&self, key: &RowKey) -> Option<&FieldErrors> {
        self.errors.get(key)
    }

    /// Drop everything bound to a row.
    pub fn forget(&mut self, key: &RowKey) {
        self.values.retain(|(k, _), _| k != key);
        self.errors.remove(key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelFlags, Contact, ContactId};

    fn row(id: &str, channels: &[NotificationChannel]) -> Row {
        Row::from_server(Contact {
            id: Some(ContactId::new(id)),
            name: "Bob".to_string(),
            phone: "123".to_string(),
            notification_channels: channels.iter().copied().collect(),
        })
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_field_names() {
        let key = RowKey::Persisted(ContactId::new("user_7"));
        let name = field_name(&key, Field::Phone);
        assert_eq!(name, "user_7_phone");
        assert_eq!(parse_field_name(&name), Some((key, Field::Phone)));
        assert_eq!(parse_field_name("7_email"), None);
        assert_eq!(parse_field_name("_name"), None);
        assert_eq!(parse_field_name("name"), None);
    }

    #[test]
    fn test_seed_then_read_round_trips_row() {
        let row = row("1", &[NotificationChannel::Sms]);
        let mut form = FormState::new();
        form.seed(&row);

        let fields = form.read(&row.key).unwrap();
        assert_eq!(
            fields,
            ContactFields {
                name: "Bob".to_string(),
                phone: Some("123".to_string()),
                flags: ChannelFlags {
                    notify_feishu: false,
                    notify_sms: true,
                    notify_phone: false,
                },
            }
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let row = Row::draft();
        let mut form = FormState::new();
        form.seed(&row);
        form.set_text(&row.key, Field::Name, "   ");

        let errors = form.read(&row.key).unwrap_err();
        assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(form.errors(&row.key), Some(&errors));

        form.set_text(&row.key, Field::Name, "Alice");
        assert!(form.read(&row.key).is_ok());
        assert!(form.errors(&row.key).is_none());
    }

    #[test]
    fn test_submission_rebuilds_channels_for_marked_rows() {
        let a = row("1", &[NotificationChannel::Sms]);
        let b = row("2", &[NotificationChannel::PhoneCall]);
        let mut form = FormState::new();
        form.seed(&a);
        form.seed(&b);

        form.apply_submission(&[
            pair("1_name", "Ann"),
            pair("1_channels", ""),
            pair("1_channels", "notify_feishu"),
            pair("1_channels", "notify_phone"),
            pair("2_channels", ""),
            pair("3_name", "nobody"),
        ]);

        let first = form.read(&a.key).unwrap();
        assert_eq!(first.name, "Ann");
        assert!(first.flags.notify_feishu);
        assert!(!first.flags.notify_sms);
        assert!(first.flags.notify_phone);

        // Marker only: every box was unchecked.
        assert!(form.channels(&b.key).is_empty());
        assert!(!form.is_bound(&RowKey::parse("3")));
    }

    #[test]
    fn test_submission_without_marker_keeps_channels() {
        let a = row("1", &[NotificationChannel::Sms]);
        let mut form = FormState::new();
        form.seed(&a);
        form.apply_submission(&[pair("1_phone", "999")]);

        assert_eq!(form.text(&a.key, Field::Phone), "999");
        assert!(form.channels(&a.key).contains(NotificationChannel::Sms));
    }

    #[test]
    fn test_forget_drops_row_values() {
        let a = row("1", &[]);
        let mut form = FormState::new();
        form.seed(&a);
        form.forget(&a.key);
        assert!(!form.is_bound(&a.key));
        assert_eq!(form.text(&a.key, Field::Name), "");
    }
}
