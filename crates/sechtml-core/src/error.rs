use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("Invalid tag name '{tag}': must start with an ASCII letter and contain only ASCII letters, digits or '-'")]
    InvalidTagName { tag: String },

    #[error("Invalid attribute name '{name}'")]
    InvalidAttributeName { name: String },

    #[error("Invalid event name '{event}': expected a name like 'onclick'")]
    InvalidEventName { event: String },

    #[error("Invalid renderer config: {0}")]
    Config(#[from] serde_json::Error),
}
