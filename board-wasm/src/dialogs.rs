use async_trait::async_trait;
use board_client::{Alert, AlertKind, Confirmation, Notifier};

/// Native browser dialogs (`window.confirm` / `window.alert`).
#[derive(Debug, Clone, Default)]
pub struct BrowserDialogs;

fn icon(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Success => "✅",
        AlertKind::Error => "❌",
    }
}

#[async_trait(?Send)]
impl Notifier for BrowserDialogs {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        let Some(window) = web_sys::window() else {
            log::warn!("No window, confirmation treated as dismissed");
            return false;
        };

        let message = format!(
            "⚠️ {}\n\n{}\n\n[OK] {}    [Cancel] {}",
            confirmation.title,
            confirmation.text,
            confirmation.confirm_label,
            confirmation.cancel_label,
        );
        window.confirm_with_message(&message).unwrap_or(false)
    }

    fn alert(&self, alert: &Alert) {
        let Some(window) = web_sys::window() else {
            log::warn!("No window for alert: {}", alert.text);
            return;
        };

        let message = format!("{} {}\n\n{}", icon(alert.kind), alert.title, alert.text);
        if let Err(e) = window.alert_with_message(&message) {
            log::warn!("Failed to show alert: {:?}", e);
        }
    }
}
