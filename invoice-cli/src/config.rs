use std::path::{Path, PathBuf};

use config::{Config as Cfg, ConfigError, Environment, File};
use invoice_core::DisplaySettings;
use invoice_pdf::{PreviewStyle, Size};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "INVOICER";

/// Settings read from `invoicer.toml` and `INVOICER__*` variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// Symbol used for terminal output.
    pub currency_symbol: String,
    /// Symbol used inside PDFs, limited to Latin-1.
    pub pdf_currency_symbol: String,
    pub phone_prefix: String,
    pub business_name: String,
    pub output_dir: PathBuf,
    pub page_width: f64,
    pub page_height: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let display = DisplaySettings::default();
        AppConfig {
            log_level: "info".to_string(),
            currency_symbol: display.currency_symbol,
            pdf_currency_symbol: "Rs. ".to_string(),
            phone_prefix: display.phone_prefix,
            business_name: "Sinha Brothers Water Supply".to_string(),
            output_dir: PathBuf::from("."),
            page_width: Size::A4.width,
            page_height: Size::A4.height,
        }
    }
}

impl AppConfig {
    /// Load `.env`, then the config file (explicit path, or an optional
    /// `invoicer.toml` in the working directory), then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_sources(file, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    fn from_sources(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let builder = match file {
            Some(path) => Cfg::builder().add_source(File::from(path).required(true)),
            None => Cfg::builder().add_source(File::with_name("invoicer").required(false)),
        };
        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            currency_symbol: self.currency_symbol.clone(),
            phone_prefix: self.phone_prefix.clone(),
        }
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.page_width, self.page_height)
    }

    pub fn preview_style(&self) -> PreviewStyle {
        PreviewStyle {
            title: self.business_name.clone(),
            currency_symbol: self.pdf_currency_symbol.clone(),
            phone_prefix: self.phone_prefix.clone(),
            page: self.page_size(),
            ..PreviewStyle::default()
        }
    }
}
