//! Templated message screens (loading, errors, success).

use crate::surface::CLOSE_AFFORDANCE_ID;

pub const DEFAULT_BUG_REPORT_LINK: &str = "mailto:alex.bigelow@kitware.com";
pub const DEFAULT_CONSULTING_LINK: &str = "http://www.kitware.com/company/contact_kitware.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Loading,
    Error,
    UserError,
    ReallyBadError,
    Success,
}

impl ScreenKind {
    fn class(self) -> &'static str {
        match self {
            ScreenKind::Loading => "loading",
            ScreenKind::Error => "error",
            ScreenKind::UserError => "user-error",
            ScreenKind::ReallyBadError => "really-bad-error",
            ScreenKind::Success => "success",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            ScreenKind::Loading => "Loading...",
            ScreenKind::Error => "Something went wrong",
            ScreenKind::UserError => "Please check your input",
            ScreenKind::ReallyBadError => "Something went really wrong",
            ScreenKind::Success => "Success!",
        }
    }

    /// Loading and fatal screens cannot be dismissed by the user.
    pub fn closable(self) -> bool {
        !matches!(self, ScreenKind::Loading | ScreenKind::ReallyBadError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportLinks {
    pub bug_report: String,
    pub consulting: String,
}

impl Default for SupportLinks {
    fn default() -> Self {
        Self {
            bug_report: DEFAULT_BUG_REPORT_LINK.into(),
            consulting: DEFAULT_CONSULTING_LINK.into(),
        }
    }
}

pub fn screen_markup(kind: ScreenKind, message: &str, links: &SupportLinks) -> String {
    let close = if kind.closable() {
        format!(r#"<button id="{CLOSE_AFFORDANCE_ID}">Close</button>"#)
    } else {
        String::new()
    };
    format!(
        concat!(
            r#"<div class="screen {class}">{close}"#,
            r#"<h2>{heading}</h2><p class="message">{message}</p>"#,
            r#"<p class="support"><a href="{bug}">Report a bug</a> "#,
            r#"<a href="{consulting}">Get help from the developers</a></p></div>"#
        ),
        class = kind.class(),
        close = close,
        heading = kind.heading(),
        message = escape_html(message),
        bug = escape_html(&links.bug_report),
        consulting = escape_html(&links.consulting),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
