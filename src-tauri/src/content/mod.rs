//! Page glue around the player: confessions board, newsletter, sections and
//! video cards.

pub mod navigation;
pub mod newsletter;
pub mod stories;
pub mod video;
