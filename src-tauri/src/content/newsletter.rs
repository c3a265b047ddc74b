use std::sync::Arc;
use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::FormError;
use crate::persistence::Storage;

pub const NEWSLETTER_KEY: &str = "thebreak_news_v1";
pub const SUBSCRIBED_FEEDBACK: &str = "¡Gracias! Te hemos suscrito.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub email: String,
    /// False when the address was already on the list
    pub added: bool,
    pub feedback: &'static str,
    pub subscribers: usize,
}

pub struct Newsletter {
    storage: Arc<dyn Storage>,
}

impl Newsletter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn subscribe(&self, email: &str) -> Result<Subscription, FormError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(FormError::EmptyEmail);
        }

        let mut emails = self.read()?;
        let added = !emails.iter().any(|e| e == email);
        if added {
            emails.push(email.to_string());
        }
        self.storage
            .set(NEWSLETTER_KEY, serde_json::to_value(&emails).map_err(anyhow::Error::from)?)?;

        tracing::info!("Newsletter subscription recorded ({} total)", emails.len());
        Ok(Subscription {
            email: email.to_string(),
            added,
            feedback: SUBSCRIBED_FEEDBACK,
            subscribers: emails.len(),
        })
    }

    pub fn subscriber_count(&self) -> usize {
        match self.read() {
            Ok(emails) => emails.len(),
            Err(e) => {
                tracing::warn!("Could not read newsletter list: {:#}", e);
                0
            }
        }
    }

    /// Line shown under the form on load, if anyone has subscribed
    pub fn status(&self) -> Option<String> {
        match self.subscriber_count() {
            0 => None,
            n => Some(format!("Suscriptores: {}", n)),
        }
    }

    fn read(&self) -> Result<Vec<String>> {
        match self.storage.get(NEWSLETTER_KEY)? {
            Some(value) => serde_json::from_value(value).context("Stored newsletter list is malformed"),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonFileStorage, MemoryStorage};
    use serde_json::Value;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<Value>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: Value) -> Result<()> {
            anyhow::bail!("quota exceeded")
        }
    }

    #[test]
    fn subscribing_twice_keeps_one_entry() {
        let newsletter = Newsletter::new(Arc::new(MemoryStorage::new()));
        assert_eq!(newsletter.status(), None);

        let first = newsletter.subscribe(" ana@example.com ").unwrap();
        assert!(first.added);
        assert_eq!(first.email, "ana@example.com");

        let second = newsletter.subscribe("ana@example.com").unwrap();
        assert!(!second.added);
        assert_eq!(second.subscribers, 1);
        assert_eq!(newsletter.status().as_deref(), Some("Suscriptores: 1"));
    }

    #[test]
    fn empty_email_is_rejected() {
        let newsletter = Newsletter::new(Arc::new(MemoryStorage::new()));
        assert!(matches!(newsletter.subscribe("  "), Err(FormError::EmptyEmail)));
    }

    #[test]
    fn storage_failure_has_user_feedback() {
        let newsletter = Newsletter::new(Arc::new(BrokenStorage));
        let err = newsletter.subscribe("ana@example.com").unwrap_err();
        assert!(matches!(err, FormError::Storage(_)));
        assert_eq!(err.feedback(), Some("No se pudo suscribir en este momento."));
    }

    #[test]
    fn unwritable_store_does_not_count_failed_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let storage = JsonFileStorage::open(blocker.join("the-break.json")).unwrap();
        let newsletter = Newsletter::new(Arc::new(storage));

        assert!(newsletter.subscribe("ana@example.com").is_err());
        assert_eq!(newsletter.status(), None);
        assert!(newsletter.subscribe("ana@example.com").is_err());
        assert_eq!(newsletter.subscriber_count(), 0);
    }
}
