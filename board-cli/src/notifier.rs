use async_trait::async_trait;
use board_client::{Alert, AlertKind, Confirmation, Notifier};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Confirmations on stdin, alerts on stdout.
pub struct TerminalNotifier {
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait(?Send)]
impl Notifier for TerminalNotifier {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        println!("⚠️  {}", confirmation.title.yellow().bold());
        println!("   {}", confirmation.text);

        if self.assume_yes {
            println!("   {} (--yes)", confirmation.confirm_label);
            return true;
        }

        print!("   {} [y/N] ", confirmation.confirm_label);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn alert(&self, alert: &Alert) {
        match alert.kind {
            AlertKind::Success => println!("✅ {} {}", alert.title.green().bold(), alert.text),
            AlertKind::Error => println!("❌ {} {}", alert.title.red().bold(), alert.text),
        }
    }
}
