use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub text: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            kind: AlertKind::Success,
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            kind: AlertKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

/// User-facing confirmations and alerts, kept out of the mutation logic.
#[async_trait(?Send)]
pub trait Notifier {
    /// Resolves to true only when the user explicitly accepts.
    async fn confirm(&self, confirmation: &Confirmation) -> bool;

    fn alert(&self, alert: &Alert);
}
