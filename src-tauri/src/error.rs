use thiserror::Error;

/// Failures surfaced to the visitor by the page forms
#[derive(Debug, Error)]
pub enum FormError {
    #[error("story text is empty")]
    EmptyStory,

    #[error("email address is empty")]
    EmptyEmail,

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl FormError {
    /// Message shown next to the form
    pub fn feedback(&self) -> Option<&'static str> {
        match self {
            FormError::EmptyStory | FormError::EmptyEmail => None,
            FormError::Storage(_) => Some("No se pudo suscribir en este momento."),
        }
    }
}
