use serde::{Deserialize, Deserializer, Serialize};

/// Selects whether production-only passes (whitespace normalization) run.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

// Hosts pass arbitrary mode strings; only "production" is special.
impl<'de> Deserialize<'de> for BuildMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mode = Option::<String>::deserialize(deserializer)?;
        Ok(match mode.as_deref() {
            Some("production") => BuildMode::Production,
            _ => BuildMode::Development,
        })
    }
}

/// Per-document configuration, all supplied by the host.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Opaque per-document scope token, rendered as `astro-<scope>`.
    #[serde(default)]
    pub scope: String,
    /// Used in diagnostics.
    #[serde(default)]
    pub filename: String,
    /// Written to `data-astro-source-file`.
    #[serde(default)]
    pub pathname: String,
    /// Written to `data-astro-source-root`.
    #[serde(default)]
    pub project_root: String,
    #[serde(default)]
    pub mode: BuildMode,
    #[serde(default)]
    pub static_extraction: bool,
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = pathname.into();
        self
    }

    pub fn with_project_root(mut self, project_root: impl Into<String>) -> Self {
        self.project_root = project_root.into();
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_static_extraction(mut self, enabled: bool) -> Self {
        self.static_extraction = enabled;
        self
    }

    pub fn is_production(&self) -> bool {
        self.mode == BuildMode::Production
    }

    pub fn scoped_class(&self) -> String {
        format!("astro-{}", self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let opts: TransformOptions = serde_json::from_str(
            r#"{"scope":"abc123","projectRoot":"/p","staticExtraction":true,"mode":"production"}"#,
        )
        .unwrap();
        assert_eq!(opts.scope, "abc123");
        assert_eq!(opts.project_root, "/p");
        assert!(opts.static_extraction);
        assert!(opts.is_production());
        assert_eq!(opts.filename, "");
    }

    #[test]
    fn test_unknown_mode_is_development() {
        let opts: TransformOptions = serde_json::from_str(r#"{"mode":"preview"}"#).unwrap();
        assert_eq!(opts.mode, BuildMode::Development);
        let opts: TransformOptions = serde_json::from_str(r#"{"mode":null}"#).unwrap();
        assert_eq!(opts.mode, BuildMode::Development);
    }

    #[test]
    fn test_scoped_class() {
        assert_eq!(TransformOptions::new().with_scope("XXXXXX").scoped_class(), "astro-XXXXXX");
        assert_eq!(TransformOptions::new().scoped_class(), "astro-");
    }
}
