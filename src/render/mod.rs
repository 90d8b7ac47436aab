//! HTML rendering of the contact table.
//!
//! The whole table sits inside a single `<form>`; every action button posts
//! the form to its own route via `formaction`, so values typed into other
//! editing rows travel along with each action.

use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::directory::Toast;
use crate::form::{field_name, Field, FormState};
use crate::models::{NotificationChannel, CHANNEL_FIELDS};
use crate::presenter::PagePhase;
use crate::rows::{Row, RowKey};

/// Everything needed to draw the page once.
pub struct PageView<'a> {
    pub phase: PagePhase,
    pub rows: &'a [Row],
    pub form: &'a FormState,
    pub toasts: &'a [Toast],
}

const STYLE: &str = "body{font-family:sans-serif;padding:2rem}\
table{border-collapse:collapse;width:100%;margin-top:1rem}\
th,td{border-bottom:1px solid #ddd;padding:.5rem;text-align:left}\
.toast{background:#fff1f0;border:1px solid #ffa39e;padding:.5rem;margin-bottom:.5rem}\
.field-error{color:#cf1322;font-size:.85em}\
.channel{margin-right:.75rem}\
button.link{background:none;border:none;color:#1677ff;cursor:pointer}\
button.danger{color:#cf1322}";

/// Everything except the unreserved characters `-._~` and alphanumerics.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Contacts</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body>");

    for toast in view.toasts {
        let _ = write!(
            html,
            "<div class=\"toast\" role=\"alert\">{}</div>",
            escape(&toast.message)
        );
    }

    match view.phase {
        PagePhase::Loading => html.push_str("<p>Loading…</p>"),
        PagePhase::Ready => render_table(&mut html, view),
    }

    html.push_str("</body></html>");
    html
}

fn render_table(html: &mut String, view: &PageView<'_>) {
    html.push_str("<form method=\"post\" action=\"/rows\">");
    html.push_str("<button type=\"submit\" formaction=\"/rows\">Add contact</button>");
    html.push_str("<table><thead><tr>");
    html.push_str("<th>Name</th><th>Phone</th><th>Notifications</th><th>Actions</th>");
    html.push_str("</tr></thead><tbody>");

    if view.rows.is_empty() {
        html.push_str("<tr><td colspan=\"4\">No contacts</td></tr>");
    }
    for row in view.rows {
        if row.is_editing() {
            render_edit_row(html, row, view.form);
        } else {
            render_view_row(html, row);
        }
    }

    html.push_str("</tbody></table></form>");
}

fn render_view_row(html: &mut String, row: &Row) {
    let channels = row.contact.notification_channels;
    let labels: Vec<&str> = if channels.is_empty() {
        vec!["None"]
    } else {
        channels.iter().map(|channel| channel.label()).collect()
    };
    let _ = write!(
        html,
        "<tr data-key=\"{key}\"><td>{name}</td><td>{phone}</td><td>{labels}</td><td>",
        key = escape(&row.key.to_string()),
        name = escape(&row.contact.name),
        phone = escape(&row.contact.phone),
        labels = escape(&labels.join(", ")),
    );
    action_button(html, &row.key, "edit", "Edit", false);
    if row.contact.id.is_some() {
        action_button(html, &row.key, "delete", "Delete", true);
    }
    html.push_str("</td></tr>");
}

fn render_edit_row(html: &mut String, row: &Row, form: &FormState) {
    let key = &row.key;
    let errors = form.errors(key);
    let _ = write!(html, "<tr data-key=\"{}\">", escape(&key.to_string()));

    for field in [Field::Name, Field::Phone] {
        let _ = write!(
            html,
            "<td><input type=\"text\" name=\"{name}\" value=\"{value}\"{required}>",
            name = escape(&field_name(key, field)),
            value = escape(form.text(key, field)),
            required = if field == Field::Name { " required" } else { "" },
        );
        if let Some(message) = errors.and_then(|e| e.get(field)) {
            let _ = write!(html, "<div class=\"field-error\">{}</div>", escape(message));
        }
        html.push_str("</td>");
    }

    let channels_name = escape(&field_name(key, Field::Channels));
    let selected = form.channels(key);
    let _ = write!(
        html,
        "<td><input type=\"hidden\" name=\"{}\" value=\"\">",
        channels_name
    );
    for channel in CHANNEL_FIELDS.iter().map(|(channel, _)| *channel) {
        render_checkbox(html, &channels_name, channel, selected.contains(channel));
    }
    html.push_str("</td><td>");

    action_button(html, key, "save", "Save", false);
    action_button(html, key, "cancel", "Cancel", false);
    html.push_str("</td></tr>");
}

fn render_checkbox(html: &mut String, name: &str, channel: NotificationChannel, checked: bool) {
    let _ = write!(
        html,
        "<label class=\"channel\"><input type=\"checkbox\" name=\"{name}\" value=\"{value}\"{checked}> {label}</label>",
        name = name,
        value = channel.wire_field(),
        checked = if checked { " checked" } else { "" },
        label = escape(channel.label()),
    );
}

fn action_button(html: &mut String, key: &RowKey, action: &str, label: &str, danger: bool) {
    let _ = write!(
        html,
        "<button type=\"submit\" class=\"link{danger}\" formnovalidate formaction=\"/rows/{key}/{action}\">{label}</button>",
        danger = if danger { " danger" } else { "" },
        key = escape(&encode_segment(&key.to_string())),
        action = action,
        label = label,
    );
}

/// Escape text for HTML element content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a single URL path segment.
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}
