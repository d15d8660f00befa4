use serde::{Deserialize, Serialize};

/// Largest page a List call will return; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Largest number of entries a single BatchCreate call accepts.
pub const MAX_BATCH_CREATE_SIZE: u32 = 1000;

/// Package used for entities that only carry a `Service` annotation.
pub const DEFAULT_PACKAGE: &str = "entpb";

/// Generation settings.
///
/// The limits are runtime concerns of the generated service; they are handed
/// through to the serving layer and never change descriptor shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub max_page_size: u32,
    pub max_batch_create_size: u32,
    pub default_package: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_page_size: MAX_PAGE_SIZE,
            max_batch_create_size: MAX_BATCH_CREATE_SIZE,
            default_package: DEFAULT_PACKAGE.to_string(),
        }
    }
}
