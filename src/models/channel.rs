//! Notification channels and the mapping between the client-side set and the
//! three independent booleans used on the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A way of alerting a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InstantMessage,
    Sms,
    PhoneCall,
}

/// Channel to wire field mapping. Every conversion between `ChannelSet` and
/// `ChannelFlags` goes through this table.
pub const CHANNEL_FIELDS: [(NotificationChannel, &str); 3] = [
    (NotificationChannel::InstantMessage, "notify_feishu"),
    (NotificationChannel::Sms, "notify_sms"),
    (NotificationChannel::PhoneCall, "notify_phone"),
];

impl NotificationChannel {
    /// Name of the boolean field carrying this channel on the wire. Also used
    /// as the checkbox value in the page form.
    pub fn wire_field(&self) -> &'static str {
        CHANNEL_FIELDS
            .iter()
            .find(|(channel, _)| channel == self)
            .map(|(_, field)| *field)
            .unwrap_or_default()
    }

    pub fn from_wire_field(field: &str) -> Option<Self> {
        CHANNEL_FIELDS
            .iter()
            .find(|(_, name)| *name == field)
            .map(|(channel, _)| *channel)
    }

    /// Human readable label shown in the table.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationChannel::InstantMessage => "Feishu alert",
            NotificationChannel::Sms => "SMS alert",
            NotificationChannel::PhoneCall => "Phone alert",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            NotificationChannel::InstantMessage => 0b001,
            NotificationChannel::Sms => 0b010,
            NotificationChannel::PhoneCall => 0b100,
        }
    }
}

/// The three notification booleans as the directory API carries them.
///
/// Reads accept `0`/`1` and `null` as well, since some directories hand the
/// flags back as integer columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFlags {
    #[serde(default, deserialize_with = "loose_flag")]
    pub notify_feishu: bool,
    #[serde(default, deserialize_with = "loose_flag")]
    pub notify_sms: bool,
    #[serde(default, deserialize_with = "loose_flag")]
    pub notify_phone: bool,
}

/// `true`/`false`, any number (zero is false) or `null` (false).
fn loose_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        None => false,
        Some(RawFlag::Bool(value)) => value,
        Some(RawFlag::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
    })
}

impl ChannelFlags {
    fn get(&self, field: &str) -> bool {
        match field {
            "notify_feishu" => self.notify_feishu,
            "notify_sms" => self.notify_sms,
            "notify_phone" => self.notify_phone,
            _ => false,
        }
    }

    fn set(&mut self, field: &str, value: bool) {
        match field {
            "notify_feishu" => self.notify_feishu = value,
            "notify_sms" => self.notify_sms = value,
            "notify_phone" => self.notify_phone = value,
            _ => {}
        }
    }
}

/// Unordered set of notification channels.
///
/// Iteration follows `CHANNEL_FIELDS` order so rendering is stable; membership
/// carries no ordering meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, channel: NotificationChannel) {
        self.0 |= channel.bit();
    }

    pub fn contains(&self, channel: NotificationChannel) -> bool {
        self.0 & channel.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = NotificationChannel> + '_ {
        CHANNEL_FIELDS
            .iter()
            .map(|(channel, _)| *channel)
            .filter(move |channel| self.contains(*channel))
    }

    /// Fold the wire booleans into a set.
    pub fn from_flags(flags: ChannelFlags) -> Self {
        CHANNEL_FIELDS
            .iter()
            .filter(|(_, field)| flags.get(field))
            .map(|(channel, _)| *channel)
            .collect()
    }

    /// Decompose the set back into the wire booleans.
    pub fn to_flags(&self) -> ChannelFlags {
        let mut flags = ChannelFlags::default();
        for (channel, field) in CHANNEL_FIELDS.iter() {
            flags.set(field, self.contains(*channel));
        }
        flags
    }
}

impl FromIterator<NotificationChannel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = NotificationChannel>>(iter: I) -> Self {
        let mut set = ChannelSet::new();
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

impl Serialize for ChannelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
