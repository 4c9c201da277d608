//! DisplayToken - what the field renderer receives
//!
//! The hidden value is the signed payload that comes back on submit. The
//! display value is a read-only decoration for humans and is never parsed.

use std::fmt;

use serde::Serialize;

/// Signed hidden value plus its human-readable decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayToken {
    /// Signed token placed in the hidden form field
    #[serde(rename = "hidden")]
    pub hidden_field_value: String,
    /// Revision shown next to the field; empty for new records
    #[serde(rename = "display")]
    pub display_value: String,
}

impl DisplayToken {
    pub(crate) fn new(hidden_field_value: String, display_value: String) -> Self {
        Self {
            hidden_field_value,
            display_value,
        }
    }

    /// Signed value for the hidden field
    pub fn hidden_field_value(&self) -> &str {
        &self.hidden_field_value
    }

    /// Decoration shown to the user
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    /// Hidden input followed by a `<div>` carrying the revision number.
    pub fn render_html(&self, name: &str) -> String {
        let mut out = String::with_capacity(64 + self.hidden_field_value.len());
        out.push_str("<input type=\"hidden\" name=\"");
        escape_html(&mut out, name);
        out.push_str("\" value=\"");
        escape_html(&mut out, &self.hidden_field_value);
        out.push_str("\" /><div>");
        escape_html(&mut out, &self.display_value);
        out.push_str("</div>");
        out
    }
}

impl fmt::Display for DisplayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value)
    }
}

fn escape_html(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}
