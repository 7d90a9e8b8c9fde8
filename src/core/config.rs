//! Purpose: Hold the defaults injected by the decoder and projector.
//! Exports: `NormalizeConfig` and the default-value constants.
//! Role: Single source for placeholder and attribution values across CLI, HTTP, and library callers.
//! Invariants: `NormalizeConfig::default()` reproduces the published defaults exactly.

pub const DEFAULT_AUTHOR: &str = "Diffuse.AI";
pub const DEFAULT_UNTITLED_PROJECT_TITLE: &str = "Untitled Project";
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "Untitled";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizeConfig {
    /// Injected as `author` when the generator omitted attribution.
    pub default_author: String,
    /// Container title when neither `project_title` nor `title` exists.
    pub untitled_project_title: String,
    /// Title of the placeholder record returned when nothing decodes.
    pub placeholder_title: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            default_author: DEFAULT_AUTHOR.to_string(),
            untitled_project_title: DEFAULT_UNTITLED_PROJECT_TITLE.to_string(),
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_string(),
        }
    }
}
