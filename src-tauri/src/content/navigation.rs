use serde::Serialize;

pub const BUILTIN_SECTIONS: &[&str] = &[
    "home",
    "podcast",
    "consejos",
    "confesiones",
    "videos",
    "enviar",
];

/// Which section and menu link are highlighted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub active_section: Option<String>,
    pub active_menu: Option<String>,
}

/// Single-page section switcher. Menu links are registered up front by the
/// section they open.
#[derive(Debug, Clone)]
pub struct Navigator {
    sections: Vec<String>,
    menu: Vec<String>,
    active: Option<String>,
}

impl Navigator {
    pub fn new<I, M>(sections: I, menu_targets: M) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            menu: menu_targets.into_iter().map(Into::into).collect(),
            active: None,
        }
    }

    /// Every built-in section has a menu link; starts on `initial`
    pub fn builtin(initial: &str) -> Self {
        let mut navigator = Self::new(
            BUILTIN_SECTIONS.iter().copied(),
            BUILTIN_SECTIONS.iter().copied(),
        );
        navigator.show(initial);
        navigator
    }

    /// Deactivate everything, then activate `section` and its menu link if
    /// they exist
    pub fn show(&mut self, section: &str) -> NavigationState {
        self.active = self.sections.iter().find(|s| *s == section).cloned();
        if self.active.is_none() {
            tracing::warn!("Unknown section '{}'", section);
        }
        self.state()
    }

    pub fn state(&self) -> NavigationState {
        let active_menu = self
            .active
            .as_ref()
            .filter(|s| self.menu.contains(s))
            .cloned();
        NavigationState {
            active_section: self.active.clone(),
            active_menu,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_starts_on_initial_section() {
        let navigator = Navigator::builtin("home");
        assert_eq!(navigator.active(), Some("home"));
        assert_eq!(navigator.state().active_menu.as_deref(), Some("home"));
    }

    #[test]
    fn section_without_menu_link_highlights_no_link() {
        let mut navigator = Navigator::new(["home", "gracias"], ["home"]);
        let state = navigator.show("gracias");
        assert_eq!(state.active_section.as_deref(), Some("gracias"));
        assert_eq!(state.active_menu, None);
    }

    #[test]
    fn unknown_section_hides_everything() {
        let mut navigator = Navigator::builtin("home");
        let state = navigator.show("nowhere");
        assert_eq!(
            state,
            NavigationState {
                active_section: None,
                active_menu: None
            }
        );
    }
}
