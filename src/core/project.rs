//! Purpose: Split a decoded field set into container and content records.
//! Exports: `ProjectionMode`, `ContainerRecord`, `ContentRecord`, `Projector`, `project`.
//! Role: Last pipeline stage; output is handed to persistence or presentation callers.
//! Invariants: Pure; no storage or rendering side effects.
//! Invariants: Content never carries `project_title`/`project_description` and always carries `author`.
//! Invariants: A container exists only in `Ingestion` mode.
use serde::{Deserialize, Serialize};

use crate::core::config::{DEFAULT_AUTHOR, DEFAULT_UNTITLED_PROJECT_TITLE, NormalizeConfig};
use crate::core::error::{Error, ErrorKind};
use crate::core::fields::{self, FieldValue, FlatFieldSet};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectionMode {
    /// First ingestion of an upstream response; a container is created.
    Ingestion,
    /// Re-decoding stored content for display; no container exists.
    ReadOnly,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRecord(FlatFieldSet);

impl ContentRecord {
    pub fn fields(&self) -> &FlatFieldSet {
        &self.0
    }

    pub fn into_fields(self) -> FlatFieldSet {
        self.0
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.text(name)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.text(fields::TITLE)
    }

    pub fn author(&self) -> Option<&str> {
        self.0.text(fields::AUTHOR)
    }

    /// Serialize for storage; decoding the blob in read-only mode reproduces this record.
    pub fn to_blob(&self) -> Result<String, Error> {
        serde_json::to_string(&self.0).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to serialize content record")
                .with_source(err)
        })
    }
}

#[derive(Clone, Debug)]
pub struct Projector {
    default_author: String,
    untitled_project_title: String,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            default_author: DEFAULT_AUTHOR.to_string(),
            untitled_project_title: DEFAULT_UNTITLED_PROJECT_TITLE.to_string(),
        }
    }
}

impl From<&NormalizeConfig> for Projector {
    fn from(config: &NormalizeConfig) -> Self {
        Self {
            default_author: config.default_author.clone(),
            untitled_project_title: config.untitled_project_title.clone(),
        }
    }
}

impl Projector {
    pub fn project(
        &self,
        mut decoded: FlatFieldSet,
        mode: ProjectionMode,
    ) -> (Option<ContainerRecord>, ContentRecord) {
        let container = match mode {
            ProjectionMode::Ingestion => Some(self.container(&decoded)),
            ProjectionMode::ReadOnly => None,
        };

        decoded.remove(fields::PROJECT_TITLE);
        decoded.remove(fields::PROJECT_DESCRIPTION);
        if !decoded.contains(fields::AUTHOR) {
            decoded.insert(fields::AUTHOR, self.default_author.as_str());
        }

        (container, ContentRecord(decoded))
    }

    fn container(&self, decoded: &FlatFieldSet) -> ContainerRecord {
        let title = decoded
            .text(fields::PROJECT_TITLE)
            .or_else(|| decoded.text(fields::TITLE))
            .unwrap_or(self.untitled_project_title.as_str());
        let description = decoded
            .text(fields::PROJECT_DESCRIPTION)
            .or_else(|| decoded.text(fields::EXCERPT))
            .unwrap_or_default();
        ContainerRecord {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Project with the published defaults.
pub fn project(
    decoded: FlatFieldSet,
    mode: ProjectionMode,
) -> (Option<ContainerRecord>, ContentRecord) {
    Projector::default().project(decoded, mode)
}

#[cfg(test)]
mod tests {
    use super::{ContainerRecord, ProjectionMode, Projector, project};
    use crate::core::config::NormalizeConfig;
    use crate::core::fields::FlatFieldSet;

    fn fields(pairs: &[(&str, &str)]) -> FlatFieldSet {
        let mut set = FlatFieldSet::new();
        for (name, value) in pairs {
            set.insert(*name, *value);
        }
        set
    }

    #[test]
    fn ingestion_defaults_container_and_author() {
        let (container, content) = project(
            fields(&[("title", "X"), ("content", "body")]),
            ProjectionMode::Ingestion,
        );
        assert_eq!(
            container,
            Some(ContainerRecord {
                title: "Untitled Project".to_string(),
                description: String::new(),
            })
        );
        assert_eq!(content.title(), Some("X"));
        assert_eq!(content.text("content"), Some("body"));
        assert_eq!(content.author(), Some("Diffuse.AI"));
        assert_eq!(content.fields().len(), 3);
    }

    #[test]
    fn project_fields_win_and_are_removed_from_content() {
        let (container, content) = project(
            fields(&[
                ("project_title", "Launch"),
                ("project_description", "Q3 plan"),
                ("title", "Post"),
                ("excerpt", "Short"),
                ("author", "Ana"),
            ]),
            ProjectionMode::Ingestion,
        );
        let container = container.expect("container");
        assert_eq!(container.title, "Launch");
        assert_eq!(container.description, "Q3 plan");
        assert!(content.get("project_title").is_none());
        assert!(content.get("project_description").is_none());
        assert_eq!(content.author(), Some("Ana"));
        assert_eq!(content.text("excerpt"), Some("Short"));
    }

    #[test]
    fn excerpt_is_description_fallback() {
        let (container, _) = project(
            fields(&[("title", "Post"), ("excerpt", "Short")]),
            ProjectionMode::Ingestion,
        );
        let container = container.expect("container");
        assert_eq!(container.title, "Post");
        assert_eq!(container.description, "Short");
    }

    #[test]
    fn empty_project_title_still_wins() {
        let (container, _) = project(
            fields(&[("project_title", ""), ("title", "Post")]),
            ProjectionMode::Ingestion,
        );
        assert_eq!(container.expect("container").title, "");
    }

    #[test]
    fn read_only_has_no_container() {
        let (container, content) =
            project(fields(&[("title", "Stored")]), ProjectionMode::ReadOnly);
        assert!(container.is_none());
        assert_eq!(content.author(), Some("Diffuse.AI"));
    }

    #[test]
    fn configured_defaults_are_used() {
        let config = NormalizeConfig {
            default_author: "Desk".to_string(),
            untitled_project_title: "Inbox".to_string(),
            ..NormalizeConfig::default()
        };
        let (container, content) =
            Projector::from(&config).project(FlatFieldSet::new(), ProjectionMode::Ingestion);
        assert_eq!(container.expect("container").title, "Inbox");
        assert_eq!(content.author(), Some("Desk"));
    }

    #[test]
    fn blob_round_trips_through_serde() {
        let (_, content) = project(
            fields(&[("title", "T"), ("content", "a\nb \"q\"")]),
            ProjectionMode::ReadOnly,
        );
        let blob = content.to_blob().expect("blob");
        let back: super::ContentRecord = serde_json::from_str(&blob).expect("parse");
        assert_eq!(back, content);
    }
}
