use crate::error::DocumentError;
use serde::Deserialize;
use std::path::Path;
use waybill_layout::{Branding, LayoutConfig, LayoutMetrics, RowLimits};
use waybill_types::PageGeometry;

/// Environment variable that overrides `tracking.public_url`.
pub const PUBLIC_TRACKING_URL_VAR: &str = "PUBLIC_TRACKING_URL";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Default page geometry for callers that do not pass their own.
    pub page: PageGeometry,
    pub branding: Branding,
    pub limits: RowLimits,
    pub metrics: LayoutMetrics,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Used to build `{base_url}/track?code=...` when no public URL is set.
    pub base_url: String,
    /// A fixed link printed and encoded instead of the per-shipment one.
    pub public_url: Option<String>,
    pub case_insensitive_lookup: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://track.express-logistics.example".to_string(),
            public_url: None,
            case_insensitive_lookup: true,
        }
    }
}

impl GeneratorConfig {
    /// Loads `path` (or `waybill.toml` in the working directory when present),
    /// then layers `WAYBILL__SECTION__KEY` environment variables on top.
    pub fn load(path: Option<&Path>) -> Result<Self, DocumentError> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("waybill").required(false)),
        };
        builder = builder.add_source(
            config::Environment::with_prefix("WAYBILL")
                .prefix_separator("__")
                .separator("__"),
        );

        let mut config: GeneratorConfig = builder.build()?.try_deserialize()?;
        if let Ok(url) = std::env::var(PUBLIC_TRACKING_URL_VAR) {
            config.apply_public_url(url);
        }
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_public_url(&mut self, url: String) {
        if !url.trim().is_empty() {
            self.tracking.public_url = Some(url.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        self.page
            .validate()
            .map_err(|e| DocumentError::Configuration(e.to_string()))?;
        self.metrics.validate()?;
        if self.limits.min_rows_per_page == 0 {
            return Err(DocumentError::Configuration(
                "limits.min_rows_per_page must be at least 1".into(),
            ));
        }
        if self.tracking.base_url.trim().is_empty() && self.tracking.public_url.is_none() {
            return Err(DocumentError::Configuration(
                "tracking.base_url must be set when no public URL is configured".into(),
            ));
        }
        Ok(())
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            metrics: self.metrics,
            limits: self.limits,
            branding: self.branding.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = GeneratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.page, PageGeometry::a4());
        assert!(config.tracking.case_insensitive_lookup);
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r##"
[page]
width = 612.0
height = 792.0

[branding]
company_name = "ACME FREIGHT"
primary = "#112233"

[limits]
max_history_rows = 40

[tracking]
base_url = "https://acme.example"
"##
        )
        .unwrap();

        let config = GeneratorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.page.width, 612.0);
        assert_eq!(config.page.margin, PageGeometry::a4().margin);
        assert_eq!(config.branding.company_name, "ACME FREIGHT");
        assert_eq!(config.branding.primary, waybill_types::Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(config.limits.max_history_rows, Some(40));
        assert_eq!(config.tracking.base_url, "https://acme.example");
    }

    #[test]
    fn rejects_geometry_without_usable_height() {
        let mut config = GeneratorConfig::default();
        config.page.height = 200.0;
        assert!(matches!(config.validate(), Err(DocumentError::Configuration(_))));
    }

    #[test]
    fn blank_public_url_is_ignored() {
        let mut config = GeneratorConfig::default();
        config.apply_public_url("   ".into());
        assert_eq!(config.tracking.public_url, None);
        config.apply_public_url(" https://t.example/x ".into());
        assert_eq!(config.tracking.public_url.as_deref(), Some("https://t.example/x"));
    }
}
