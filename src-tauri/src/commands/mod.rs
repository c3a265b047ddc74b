pub mod navigation;
pub mod newsletter;
pub mod player;
pub mod settings;
pub mod stories;
pub mod video;
