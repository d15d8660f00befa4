use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse schema JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// An annotation payload did not decode into its typed configuration.
    #[error("entity `{entity}`: unable to decode {annotation} annotation{}: {source}", location(.field))]
    AnnotationDecode {
        entity: String,
        /// Field or edge carrying the annotation; `None` for entity-level annotations.
        field: Option<String>,
        annotation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("entity `{0}` is declared more than once")]
    DuplicateEntity(String),
}

fn location(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" on `{f}`"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate field group `{0}`")]
pub struct DuplicateGroupError(pub String);
