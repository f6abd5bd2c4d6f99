//! Configuration of a batch run.
use crate::{
    error::{AnalysisError, Result},
    integration::{Cutoffs, IntegrationParams},
    keys::IntegrationMethod,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Settings for a [`BatchProcessor`](crate::BatchProcessor).
///
/// Every field has a default, so a TOML document only needs the values that differ.
///
/// # Examples
///
/// ```rust
/// use column_moisture::{BatchConfig, IntegrationMethod};
///
/// let config = BatchConfig::from_toml_str(r#"
///     parallel = false
///     pw_method = "sum"
///     outlier_iqr_k = 1.0
///
///     [cutoffs]
///     upper = 10000.0
/// "#).unwrap();
///
/// assert!(!config.parallel);
/// assert_eq!(config.pw_method, IntegrationMethod::Sum);
/// assert_eq!(config.tm_method, IntegrationMethod::Trapz);
/// assert_eq!(config.cutoffs.upper, Some(10000.0));
/// assert_eq!(config.params.gravity, 9.79);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Base directory for run products. The crate itself never touches the file system, the
    /// directories are for the readers and writers that feed it.
    pub work_dir: PathBuf,
    /// Directory of radiosonde files, if any, relative to `work_dir` unless absolute.
    pub sounding_dir: Option<PathBuf>,
    /// Directory of reanalysis files, if any, relative to `work_dir` unless absolute.
    pub reanalysis_dir: Option<PathBuf>,
    /// Process profiles on the rayon thread pool.
    pub parallel: bool,
    /// Samples outside these bounds are excluded before integrating.
    pub cutoffs: Cutoffs,
    /// Physical constants for the layer difference integration.
    pub params: IntegrationParams,
    /// Method for the precipitable water.
    pub pw_method: IntegrationMethod,
    /// Method for the mean temperature.
    pub tm_method: IntegrationMethod,
    /// Multiple of the interquartile range beyond which results are dropped, no screening if
    /// `None`.
    pub outlier_iqr_k: Option<f64>,
    /// Use normal gravity at the profile latitude instead of `params.gravity` when the latitude
    /// is known.
    pub gravity_from_latitude: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            work_dir: PathBuf::from("."),
            sounding_dir: None,
            reanalysis_dir: None,
            parallel: true,
            cutoffs: Cutoffs::default(),
            params: IntegrationParams::default(),
            pw_method: IntegrationMethod::Trapz,
            tm_method: IntegrationMethod::Trapz,
            outlier_iqr_k: None,
            gravity_from_latitude: false,
        }
    }
}

impl BatchConfig {
    /// Parse and validate a configuration from TOML text.
    ///
    /// An unknown integration method fails with `UnsupportedFormula`, any other malformed
    /// document with `InvalidInput`.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = text.parse().map_err(|err: toml::de::Error| {
            warn!(%err, "unable to parse batch configuration");
            AnalysisError::InvalidInput
        })?;

        for key in &["pw_method", "tm_method"] {
            if let Some(name) = table.get(*key).and_then(toml::Value::as_str) {
                IntegrationMethod::from_name(name)?;
            }
        }

        let config: BatchConfig = toml::Value::Table(table).try_into().map_err(|err| {
            warn!(%err, "invalid batch configuration");
            AnalysisError::InvalidInput
        })?;

        config.validate()
    }

    /// Check that the physical constants are positive and the screening multiple is usable.
    pub fn validate(self) -> Result<Self> {
        let IntegrationParams {
            gravity,
            water_density,
        } = self.params;

        let positive = |val: f64| val.is_finite() && val > 0.0;

        if !positive(gravity) || !positive(water_density) {
            return Err(AnalysisError::InvalidInput);
        }

        if let Some(k) = self.outlier_iqr_k {
            if !k.is_finite() || k < 0.0 {
                return Err(AnalysisError::InvalidInput);
            }
        }

        Ok(self)
    }

    /// Directory of the radiosonde files resolved against the work directory.
    pub fn sounding_path(&self) -> Option<PathBuf> {
        self.sounding_dir.as_ref().map(|dir| self.work_dir.join(dir))
    }

    /// Directory of the reanalysis files resolved against the work directory.
    pub fn reanalysis_path(&self) -> Option<PathBuf> {
        self.reanalysis_dir.as_ref().map(|dir| self.work_dir.join(dir))
    }

    /// The method used for the alternate precipitable water, whichever one `pw_method` is not.
    pub fn alternate_pw_method(&self) -> IntegrationMethod {
        match self.pw_method {
            IntegrationMethod::Trapz => IntegrationMethod::Sum,
            IntegrationMethod::Sum => IntegrationMethod::Trapz,
        }
    }
}
