//! An email sender that does not send anything

use std::error::Error;

use async_trait::async_trait;

use crate::traits::EmailSender;

/// Writes outgoing messages to the log, and reports them as sent
#[derive(Clone, Copy, Debug, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), Box<dyn Error>> {
        if to.trim().is_empty() {
            return Err("Cannot send an email without a recipient".into());
        }
        log::info!("Sending email to {}: {:?} ({} bytes)", to, subject, body.len());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn needs_a_recipient() {
        let sender = LogEmailSender;
        assert!(sender.send("team@company.com", "Hi", "Hello").await.is_ok());
        assert!(sender.send("  ", "Hi", "Hello").await.is_err());
    }
}
