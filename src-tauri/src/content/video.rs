use serde::Serialize;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const EMBED_URL: &str = "https://www.youtube.com/embed/";
const EMBED_PERMISSIONS: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// YouTube ids are URL-safe base64
pub fn is_valid_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

/// Attributes of the inline player that replaces a thumbnail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFrame {
    pub src: String,
    pub allow: &'static str,
    pub allow_fullscreen: bool,
    pub frame_border: u8,
    pub close_label: &'static str,
}

impl EmbedFrame {
    pub fn for_video(video_id: &str) -> Self {
        Self {
            src: format!("{}{}?rel=0&autoplay=1", EMBED_URL, video_id),
            allow: EMBED_PERMISSIONS,
            allow_fullscreen: true,
            frame_border: 0,
            close_label: "Cerrar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VideoAction {
    OpenExternal { url: String },
    Embed { frame: EmbedFrame },
    Nothing,
}

/// Click on a video card. The modifier (Alt) embeds inline, a plain click
/// opens the video on YouTube.
pub fn activate(video_id: Option<&str>, modifier: bool) -> VideoAction {
    let Some(id) = video_id.filter(|id| is_valid_video_id(id)) else {
        if let Some(id) = video_id {
            tracing::warn!("Ignoring malformed video id '{}'", id);
        }
        return VideoAction::Nothing;
    };

    if modifier {
        VideoAction::Embed {
            frame: EmbedFrame::for_video(id),
        }
    } else {
        VideoAction::OpenExternal { url: watch_url(id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_click_opens_youtube() {
        assert_eq!(
            activate(Some("dQw4w9WgXcQ"), false),
            VideoAction::OpenExternal {
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into()
            }
        );
    }

    #[test]
    fn modifier_click_embeds_inline() {
        match activate(Some("abc_DEF-123"), true) {
            VideoAction::Embed { frame } => {
                assert_eq!(frame.src, "https://www.youtube.com/embed/abc_DEF-123?rel=0&autoplay=1");
                assert!(frame.allow_fullscreen);
                assert_eq!(frame.frame_border, 0);
            }
            other => panic!("expected embed, got {:?}", other),
        }
    }

    #[test]
    fn missing_or_malformed_ids_do_nothing() {
        assert_eq!(activate(None, true), VideoAction::Nothing);
        assert_eq!(activate(Some("x\"><script>"), false), VideoAction::Nothing);
        assert_eq!(activate(Some(""), false), VideoAction::Nothing);
    }
}
