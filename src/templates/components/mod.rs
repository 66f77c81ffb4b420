use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            NoticeKind::Info => "notice notice-info",
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Warning => "notice notice-warning",
            NoticeKind::Error => "notice notice-error",
        }
    }
}

/// A one-line status message shown above page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn notice(n: &Notice) -> Markup {
    html! {
        div class=(n.kind.class()) role="status" { (n.message) }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Dashboard counter linking to the list it summarises.
pub fn stat_card(label: &str, value: usize, href: &str) -> Markup {
    html! {
        a class="card stat" href=(href) {
            div class="stat-value" { (value) }
            div class="stat-label" { (label) }
        }
    }
}

pub fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = message {
            div class="field-error" { (msg) }
        }
    }
}
