//! Configuration module
//!
//! Limits of the attachment subsystem and the settings of its local collaborators
//! (ffprobe, upload directory, logging). Defaults are the storefront contract values
//! from [`constants`](crate::constants); every field can be overridden from the
//! environment with a `VITRINE_` variable.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{
    DEFAULT_FFPROBE_PATH, DEFAULT_UPLOAD_CHUNK_BYTES, MAX_DESCRIPTION_LENGTH,
    MAX_FILE_SIZE_BYTES, MAX_TESTIMONY_PHOTOS, MAX_TESTIMONY_VIDEOS, MAX_VIDEO_DURATION_SECS,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Attachment subsystem configuration
#[derive(Clone, Debug, Serialize)]
pub struct AttachmentConfig {
    pub max_file_size_bytes: u64,
    pub max_video_duration_secs: f64,
    pub max_description_length: usize,
    pub max_testimony_photos: usize,
    pub max_testimony_videos: usize,
    pub ffprobe_path: String,
    /// Directory used by the local blob uploader; `None` keeps uploads in memory
    pub upload_dir: Option<String>,
    pub upload_chunk_bytes: usize,
    pub environment: String,
    pub log_format: LogFormat,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            max_video_duration_secs: MAX_VIDEO_DURATION_SECS,
            max_description_length: MAX_DESCRIPTION_LENGTH,
            max_testimony_photos: MAX_TESTIMONY_PHOTOS,
            max_testimony_videos: MAX_TESTIMONY_VIDEOS,
            ffprobe_path: DEFAULT_FFPROBE_PATH.to_string(),
            upload_dir: None,
            upload_chunk_bytes: DEFAULT_UPLOAD_CHUNK_BYTES,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when it is unset.
/// An unparsable value also falls back and is recorded in `warnings`.
fn parse_var<T: FromStr>(name: &str, default: T, warnings: &mut Vec<String>) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warnings.push(format!(
                "Ignoring unparsable value {:?} for {}, using default",
                raw, name
            ));
            default
        }),
        Err(_) => default,
    }
}

impl AttachmentConfig {
    /// Build configuration from `VITRINE_*` environment variables and log any
    /// ignored values.
    ///
    /// Binaries are expected to call `dotenvy::dotenv()` first. Hosts that install
    /// their subscriber from this configuration should use [`Self::from_env_with_warnings`]
    /// and log the warnings afterwards.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let (config, warnings) = Self::from_env_with_warnings()?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Ok(config)
    }

    /// Build configuration from `VITRINE_*` environment variables, returning the
    /// values that were ignored instead of logging them.
    pub fn from_env_with_warnings() -> Result<(Self, Vec<String>), anyhow::Error> {
        let defaults = Self::default();
        let mut warnings = Vec::new();
        let w = &mut warnings;

        let log_format = match env::var("VITRINE_LOG_FORMAT") {
            Ok(raw) => raw.parse::<LogFormat>()?,
            Err(_) => defaults.log_format,
        };

        let upload_dir = env::var("VITRINE_UPLOAD_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let config = Self {
            max_file_size_bytes: parse_var(
                "VITRINE_MAX_FILE_SIZE_BYTES",
                defaults.max_file_size_bytes,
                w,
            ),
            max_video_duration_secs: parse_var(
                "VITRINE_MAX_VIDEO_DURATION_SECS",
                defaults.max_video_duration_secs,
                w,
            ),
            max_description_length: parse_var(
                "VITRINE_MAX_DESCRIPTION_LENGTH",
                defaults.max_description_length,
                w,
            ),
            max_testimony_photos: parse_var(
                "VITRINE_MAX_TESTIMONY_PHOTOS",
                defaults.max_testimony_photos,
                w,
            ),
            max_testimony_videos: parse_var(
                "VITRINE_MAX_TESTIMONY_VIDEOS",
                defaults.max_testimony_videos,
                w,
            ),
            ffprobe_path: env::var("VITRINE_FFPROBE_PATH").unwrap_or(defaults.ffprobe_path),
            upload_dir,
            upload_chunk_bytes: parse_var(
                "VITRINE_UPLOAD_CHUNK_BYTES",
                defaults.upload_chunk_bytes,
                w,
            ),
            environment: env::var("VITRINE_ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or(defaults.environment),
            log_format,
        };

        config.validate()?;
        Ok((config, warnings))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("VITRINE_MAX_FILE_SIZE_BYTES must be greater than 0"));
        }

        if !self.max_video_duration_secs.is_finite() || self.max_video_duration_secs <= 0.0 {
            return Err(anyhow::anyhow!(
                "VITRINE_MAX_VIDEO_DURATION_SECS must be a positive number of seconds"
            ));
        }

        if self.max_description_length == 0 {
            return Err(anyhow::anyhow!("VITRINE_MAX_DESCRIPTION_LENGTH must be greater than 0"));
        }

        if self.max_testimony_photos == 0 || self.max_testimony_videos == 0 {
            return Err(anyhow::anyhow!(
                "VITRINE_MAX_TESTIMONY_PHOTOS and VITRINE_MAX_TESTIMONY_VIDEOS must be greater than 0"
            ));
        }

        if self.upload_chunk_bytes == 0 {
            return Err(anyhow::anyhow!("VITRINE_UPLOAD_CHUNK_BYTES must be greater than 0"));
        }

        if self.ffprobe_path.trim().is_empty() {
            return Err(anyhow::anyhow!("VITRINE_FFPROBE_PATH must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let config = AttachmentConfig::default();
        assert_eq!(config.max_file_size_bytes, 838_860_800);
        assert_eq!(config.max_video_duration_secs, 300.0);
        assert_eq!(config.max_description_length, 1500);
        assert_eq!(config.max_testimony_photos, 5);
        assert_eq!(config.max_testimony_videos, 3);
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = AttachmentConfig {
            max_testimony_videos: 0,
            ..AttachmentConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AttachmentConfig {
            max_video_duration_secs: f64::NAN,
            ..AttachmentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_var_falls_back_with_warning() {
        let mut warnings = Vec::new();

        env::set_var("VITRINE_TEST_PARSE_VAR_OK", " 42 ");
        assert_eq!(parse_var("VITRINE_TEST_PARSE_VAR_OK", 7usize, &mut warnings), 42);
        assert_eq!(parse_var("VITRINE_TEST_PARSE_VAR_UNSET", 7usize, &mut warnings), 7);
        assert!(warnings.is_empty());

        env::set_var("VITRINE_TEST_PARSE_VAR_BAD", "lots");
        assert_eq!(parse_var("VITRINE_TEST_PARSE_VAR_BAD", 7usize, &mut warnings), 7);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("VITRINE_TEST_PARSE_VAR_BAD"));
        assert!(warnings[0].contains("lots"));

        env::remove_var("VITRINE_TEST_PARSE_VAR_OK");
        env::remove_var("VITRINE_TEST_PARSE_VAR_BAD");
    }

    #[test]
    fn test_from_env_reports_ignored_values() {
        env::set_var("VITRINE_MAX_TESTIMONY_PHOTOS", "five");
        let result = AttachmentConfig::from_env_with_warnings();
        env::remove_var("VITRINE_MAX_TESTIMONY_PHOTOS");

        let (config, warnings) = result.unwrap();
        assert_eq!(config.max_testimony_photos, 5);
        assert_eq!(config.max_file_size_bytes, MAX_FILE_SIZE_BYTES);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("VITRINE_MAX_TESTIMONY_PHOTOS"));
    }

    #[test]
    fn test_production_detection() {
        let config = AttachmentConfig {
            environment: "Prod".to_string(),
            ..AttachmentConfig::default()
        };
        assert!(config.is_production());
    }
}
