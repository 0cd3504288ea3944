/// Lifecycle of a single mutation as the UI tracks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl MutationStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Result of a confirm/submit/alert flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The user declined the confirmation; no request was issued.
    Dismissed,
    /// The backend accepted the request; carries its `msg`.
    Succeeded(String),
    /// The request failed; carries the text shown to the user.
    Failed(String),
}

impl MutationOutcome {
    pub fn status(&self) -> MutationStatus {
        match self {
            Self::Dismissed => MutationStatus::Idle,
            Self::Succeeded(_) => MutationStatus::Success,
            Self::Failed(_) => MutationStatus::Error,
        }
    }
}
