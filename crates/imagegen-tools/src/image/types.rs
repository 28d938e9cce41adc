use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::GenerationError;

/// One image to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageRequest {
    /// User prompt
    pub prompt: String,
    /// Session ID
    #[serde(default)]
    pub session_id: String,
    /// Image name generated
    pub image_name: String,
}

impl ImageRequest {
    pub fn new(
        prompt: impl Into<String>,
        session_id: impl Into<String>,
        image_name: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            session_id: session_id.into(),
            image_name: image_name.into(),
        }
    }

    /// Both `prompt` and `image_name` must be non-empty, and `image_name`
    /// must be a bare file stem so the image stays inside the save directory
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.is_empty() || self.image_name.is_empty() {
            return Err(GenerationError::invalid_argument(
                "Parameters prompt and image_name cannot be empty",
            ));
        }
        if self.image_name.contains(['/', '\\']) || self.image_name == ".." {
            return Err(GenerationError::invalid_argument(format!(
                "image_name '{}' must not contain path separators",
                self.image_name
            )));
        }
        Ok(())
    }
}

/// Where an image named `image_name` is stored: `{save_directory}/{image_name}.png`
pub fn target_path(save_directory: &Path, image_name: &str) -> PathBuf {
    save_directory.join(format!("{}.png", image_name))
}

/// Successful outcome of a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// The endpoint was called and `bytes` bytes were written to `path`
    Written { path: PathBuf, bytes: usize },
    /// Simulated mode: nothing was called or written
    Simulated { path: PathBuf },
}

impl GenerationOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written { path, .. } | Self::Simulated { path } => path,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// The record the agent hands back to its caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageResult {
    /// A concise name for the image
    pub name: String,
    /// What is going on in the image
    pub description: String,
    /// Where the image was saved
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path() {
        let path = target_path(Path::new("/tmp/x"), "sunset");
        assert_eq!(path, PathBuf::from("/tmp/x/sunset.png"));
    }

    #[test]
    fn test_validate() {
        assert!(ImageRequest::new("a cat", "s1", "cat").validate().is_ok());
        assert!(ImageRequest::new("a cat", "", "cat").validate().is_ok());

        let err = ImageRequest::new("", "s1", "cat").validate().unwrap_err();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));
        assert!(ImageRequest::new("a cat", "s1", "").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_path_like_names() {
        for name in ["/etc/cron.d/evil", "../escape", "nested/cat", "..\\cat", ".."] {
            let err = ImageRequest::new("a cat", "s1", name).validate().unwrap_err();
            assert!(matches!(err, GenerationError::InvalidArgument(_)), "{}", name);
        }
        assert!(ImageRequest::new("a cat", "s1", "cat.v2").validate().is_ok());
    }

    #[test]
    fn test_request_session_id_optional() {
        let request: ImageRequest =
            serde_json::from_str(r#"{"prompt": "a cat", "image_name": "cat"}"#).unwrap();
        assert_eq!(request.session_id, "");
    }

    #[test]
    fn test_outcome_accessors() {
        let written = GenerationOutcome::Written {
            path: PathBuf::from("/tmp/x/a.png"),
            bytes: 3,
        };
        assert!(written.was_written());
        assert_eq!(written.path(), Path::new("/tmp/x/a.png"));

        let simulated = GenerationOutcome::Simulated {
            path: PathBuf::from("/tmp/x/a.png"),
        };
        assert!(!simulated.was_written());
        assert_eq!(
            serde_json::to_value(&simulated).unwrap()["status"],
            "simulated"
        );
    }
}
