use std::sync::Arc;
use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

use crate::error::FormError;
use crate::persistence::Storage;

pub const STORIES_KEY: &str = "thebreak_stories_v1";
pub const ANONYMOUS: &str = "Anónimo";
pub const THANKS_FEEDBACK: &str = "¡Gracias! Tu historia se ha enviado y aparece en Confesiones.";
pub const STORIES_SECTION: &str = "confesiones";

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

/// A confession as stored and rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default = "anonymous")]
    pub name: String,
    pub story: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub created: i64,
}

/// Text for one card in the Confesiones list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryCard {
    pub quote: String,
    pub byline: String,
}

impl Story {
    pub fn card(&self) -> StoryCard {
        StoryCard {
            quote: self.quote(),
            byline: self.byline(),
        }
    }

    pub fn quote(&self) -> String {
        format!("\"{}\"", self.story)
    }

    pub fn byline(&self) -> String {
        let name = if self.name.trim().is_empty() {
            ANONYMOUS
        } else {
            &self.name
        };
        format!("— {}", name)
    }
}

/// What the page does after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryReceipt {
    pub story: Story,
    pub feedback: &'static str,
    pub navigate_to: &'static str,
    pub persisted: bool,
}

pub struct StoryBoard {
    storage: Arc<dyn Storage>,
    limit: usize,
}

impl StoryBoard {
    pub fn new(storage: Arc<dyn Storage>, limit: usize) -> Self {
        Self { storage, limit }
    }

    /// Validate and store a story, newest first. A storage failure is logged
    /// and the story is still handed back for display.
    pub fn submit(&self, name: &str, story: &str) -> Result<StoryReceipt, FormError> {
        let story = story.trim();
        if story.is_empty() {
            return Err(FormError::EmptyStory);
        }
        let name = match name.trim() {
            "" => ANONYMOUS,
            n => n,
        };

        let story = Story {
            name: name.to_string(),
            story: story.to_string(),
            created: chrono::Utc::now().timestamp_millis(),
        };

        let persisted = match self.prepend(&story) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving story to storage: {:#}", e);
                false
            }
        };

        Ok(StoryReceipt {
            story,
            feedback: THANKS_FEEDBACK,
            navigate_to: STORIES_SECTION,
            persisted,
        })
    }

    /// Stored stories, newest first. Unreadable data yields an empty board.
    pub fn load(&self) -> Vec<Story> {
        match self.read() {
            Ok(stories) => stories,
            Err(e) => {
                tracing::error!("Error loading stories from storage: {:#}", e);
                Vec::new()
            }
        }
    }

    fn read(&self) -> Result<Vec<Story>> {
        match self.storage.get(STORIES_KEY)? {
            Some(value) => serde_json::from_value(value).context("Stored stories are malformed"),
            None => Ok(Vec::new()),
        }
    }

    fn prepend(&self, story: &Story) -> Result<()> {
        let mut stories = self.read()?;
        stories.insert(0, story.clone());
        stories.truncate(self.limit);
        self.storage.set(STORIES_KEY, serde_json::to_value(&stories)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use serde_json::json;

    fn board(limit: usize) -> (Arc<MemoryStorage>, StoryBoard) {
        let storage = Arc::new(MemoryStorage::new());
        let board = StoryBoard::new(storage.clone(), limit);
        (storage, board)
    }

    #[test]
    fn submit_trims_and_defaults_the_name() {
        let (_, board) = board(200);
        let receipt = board.submit("   ", "  Reprobé cálculo  ").unwrap();

        assert_eq!(receipt.story.name, ANONYMOUS);
        assert_eq!(receipt.story.story, "Reprobé cálculo");
        assert_eq!(receipt.story.quote(), "\"Reprobé cálculo\"");
        assert_eq!(receipt.story.byline(), "— Anónimo");
        assert_eq!(
            receipt.story.card(),
            StoryCard {
                quote: "\"Reprobé cálculo\"".into(),
                byline: "— Anónimo".into(),
            }
        );
        assert_eq!(receipt.navigate_to, "confesiones");
        assert!(receipt.persisted);
    }

    #[test]
    fn empty_story_is_rejected_and_not_stored() {
        let (storage, board) = board(200);
        assert!(matches!(board.submit("Ana", " \n "), Err(FormError::EmptyStory)));
        assert_eq!(storage.get(STORIES_KEY).unwrap(), None);
    }

    #[test]
    fn newest_first_and_capped() {
        let (_, board) = board(2);
        board.submit("a", "uno").unwrap();
        board.submit("b", "dos").unwrap();
        board.submit("c", "tres").unwrap();

        let stories: Vec<String> = board.load().into_iter().map(|s| s.story).collect();
        assert_eq!(stories, vec!["tres", "dos"]);
    }

    #[test]
    fn legacy_entries_without_name_render_anonymous() {
        let (storage, board) = board(200);
        storage
            .set(STORIES_KEY, json!([{ "story": "sin nombre", "created": 1 }]))
            .unwrap();

        let stories = board.load();
        assert_eq!(stories[0].byline(), "— Anónimo");
    }

    #[test]
    fn malformed_storage_loads_empty() {
        let (storage, board) = board(200);
        storage.set(STORIES_KEY, json!({"oops": true})).unwrap();
        assert!(board.load().is_empty());
    }
}
