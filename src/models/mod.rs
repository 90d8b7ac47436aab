//! Data models for the contact admin page.
//!
//! Wire records mirror the directory API's JSON shapes; `Contact` is the
//! client-side view with the notification flags folded into a set.

mod channel;
mod contact;

pub use channel::*;
pub use contact::*;
