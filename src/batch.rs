//! Reduce many profiles to scalar summaries and cloud labels.
//!
//! Every input produces exactly one output in the same position. A profile that cannot be
//! integrated yields a summary with missing values rather than stopping the batch.
use crate::{
    cloud::{cloud_layers, CloudLayer},
    config::BatchConfig,
    error::Result,
    hybrid::{GridColumn, HybridLevelTable, ModelColumn},
    integration::{
        surface_temperature, Column, ContinuousIntegral, Cutoffs, IntegrationParams,
        LayerDifference, VerticalIntegrationStrategy,
    },
    keys::IntegrationMethod,
    met_formulas::gravity_at_latitude,
    sounding::Sounding,
    stats::screen_outliers,
    summary::{ScalarSummary, SummaryVariable},
};
use metfor::Quantity;
use rayon::prelude::*;
use tracing::{debug, info};

/// Metadata describing how a batch was processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchMetadata {
    /// Cutoffs applied before integrating.
    pub cutoffs: Cutoffs,
    /// Method of the precipitable water.
    pub pw_method: IntegrationMethod,
    /// Method of the alternate precipitable water.
    pub alternate_pw_method: IntegrationMethod,
    /// Method of the mean temperature.
    pub tm_method: IntegrationMethod,
    /// Number of profiles whose summary is entirely missing.
    pub num_missing: usize,
}

impl BatchMetadata {
    /// Units of a summary variable.
    pub fn units(&self, var: SummaryVariable) -> &'static str {
        var.units()
    }
}

/// The output of processing a batch of soundings.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// One summary per sounding, in input order.
    pub summaries: Vec<ScalarSummary>,
    /// Cloud labels for every level of each sounding, in input order.
    pub cloud_layers: Vec<Vec<Option<CloudLayer>>>,
    /// How the batch was processed.
    pub metadata: BatchMetadata,
}

/// Applies a [`BatchConfig`] to collections of profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a processor for a configuration.
    pub fn new(config: BatchConfig) -> Self {
        BatchProcessor { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Summarize radiosonde profiles and label their cloud layers.
    ///
    /// The summary time is the nominal time of each sounding, if it has one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{BatchConfig, BatchProcessor, Sounding};
    /// use column_moisture::doctest::make_test_sounding;
    ///
    /// let processor = BatchProcessor::new(BatchConfig::default());
    /// let result = processor.process_soundings(&[make_test_sounding(), Sounding::new()]);
    ///
    /// assert_eq!(result.summaries.len(), 2);
    /// assert!(result.summaries[0].precipitable_water().is_some());
    /// assert!(result.summaries[1].is_missing());
    /// assert_eq!(result.metadata.num_missing, 1);
    /// ```
    pub fn process_soundings(&self, soundings: &[Sounding]) -> BatchResult {
        info!(
            count = soundings.len(),
            parallel = self.config.parallel,
            "processing soundings"
        );

        let (mut summaries, cloud_layers): (Vec<_>, Vec<_>) = self
            .map_profiles(soundings, |index, snd| {
                (self.summarize_sounding(index, snd), classify(index, snd))
            })
            .into_iter()
            .unzip();

        self.screen(&mut summaries);

        BatchResult {
            metadata: self.metadata(&summaries),
            summaries,
            cloud_layers,
        }
    }

    /// Summarize model level columns.
    pub fn process_model_columns(&self, columns: &[ModelColumn]) -> Vec<ScalarSummary> {
        info!(
            count = columns.len(),
            parallel = self.config.parallel,
            "processing model columns"
        );

        let mut summaries = self.map_profiles(columns, |index, model| {
            self.summarize_model_column(index, model)
        });

        self.screen(&mut summaries);
        summaries
    }

    /// Reconstruct the level pressure of each grid column from the table and summarize it.
    ///
    /// A column that does not fit the table yields a missing summary.
    pub fn process_hybrid_grid(
        &self,
        table: &HybridLevelTable,
        columns: &[GridColumn],
    ) -> Vec<ScalarSummary> {
        info!(
            count = columns.len(),
            levels = table.num_full_levels(),
            parallel = self.config.parallel,
            "processing hybrid level grid"
        );

        let mut summaries = self.map_profiles(columns, |index, grid| {
            match grid.to_model_column(table) {
                Ok(model) => self.summarize_model_column(index, &model),
                Err(err) => {
                    debug!(index, %err, "unable to reconstruct model column");
                    ScalarSummary::new(index, grid.valid_time)
                }
            }
        });

        self.screen(&mut summaries);
        summaries
    }

    fn map_profiles<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(usize, &T) -> U + Sync + Send,
    {
        if self.config.parallel {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| f(index, item))
                .collect()
        } else {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| f(index, item))
                .collect()
        }
    }

    fn summarize_sounding(&self, index: usize, snd: &Sounding) -> ScalarSummary {
        let summary = ScalarSummary::new(index, snd.nominal_time().ok()).with_value(
            SummaryVariable::SurfaceTemperature,
            surface_temperature(snd).map(|t| t.unpack()),
        );

        let column = Column::from_sounding(snd, &self.config.cutoffs);
        self.integrate(index, &ContinuousIntegral, column, summary)
    }

    fn summarize_model_column(&self, index: usize, model: &ModelColumn) -> ScalarSummary {
        let ts = model.surface_temperature().map_t(|t| t.unpack());

        let summary = ScalarSummary::new(index, model.valid_time())
            .with_value(SummaryVariable::SurfaceTemperature, ts);

        let strategy = LayerDifference::new(self.params_for(model.latitude()));
        let column = Column::from_model_column(model, &self.config.cutoffs);
        self.integrate(index, &strategy, column, summary)
    }

    fn params_for(&self, latitude: Option<f64>) -> IntegrationParams {
        match latitude {
            Some(lat) if self.config.gravity_from_latitude => IntegrationParams {
                gravity: gravity_at_latitude(lat),
                ..self.config.params
            },
            _ => self.config.params,
        }
    }

    fn integrate(
        &self,
        index: usize,
        strategy: &dyn VerticalIntegrationStrategy,
        column: Result<Column>,
        summary: ScalarSummary,
    ) -> ScalarSummary {
        let column = match column {
            Ok(column) => column,
            Err(err) => {
                debug!(index, %err, "profile not integrated");
                return summary;
            }
        };

        let pw = strategy.precipitable_water(&column, self.config.pw_method);
        let pw_alt = strategy.precipitable_water(&column, self.config.alternate_pw_method());
        let tm = strategy.mean_temperature(&column, self.config.tm_method);

        summary
            .with_value(
                SummaryVariable::PrecipitableWater,
                value_or_log(index, SummaryVariable::PrecipitableWater, pw),
            )
            .with_value(
                SummaryVariable::PrecipitableWaterAlt,
                value_or_log(index, SummaryVariable::PrecipitableWaterAlt, pw_alt),
            )
            .with_value(
                SummaryVariable::MeanTemperature,
                value_or_log(index, SummaryVariable::MeanTemperature, tm),
            )
    }

    fn screen(&self, summaries: &mut [ScalarSummary]) {
        if let Some(k) = self.config.outlier_iqr_k {
            screen_outliers(summaries, k);
        }
    }

    fn metadata(&self, summaries: &[ScalarSummary]) -> BatchMetadata {
        BatchMetadata {
            cutoffs: self.config.cutoffs,
            pw_method: self.config.pw_method,
            alternate_pw_method: self.config.alternate_pw_method(),
            tm_method: self.config.tm_method,
            num_missing: summaries.iter().filter(|s| s.is_missing()).count(),
        }
    }
}

fn value_or_log<T: Quantity>(index: usize, var: SummaryVariable, res: Result<T>) -> Option<f64> {
    match res {
        Ok(val) => Some(val.unpack()),
        Err(err) => {
            debug!(index, variable = var.short_name(), %err, "value missing");
            None
        }
    }
}

fn classify(index: usize, snd: &Sounding) -> Vec<Option<CloudLayer>> {
    cloud_layers(snd).unwrap_or_else(|err| {
        debug!(index, %err, "cloud layers not classified");
        vec![None; snd.height_profile().len()]
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{sounding::doctest::make_test_sounding, units::Field};
    use metfor::{Celsius, Meters};
    use optional::some;

    fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
        (val1 - val2).abs() < eps
    }

    fn sequential() -> BatchConfig {
        BatchConfig {
            parallel: false,
            ..BatchConfig::default()
        }
    }

    fn model_column(q_scale: f64) -> ModelColumn {
        ModelColumn::from_fields(
            &Field::new(vec![260.0, 275.0, 288.0], "K"),
            &Field::new(
                vec![0.001 * q_scale, 0.004 * q_scale, 0.010 * q_scale],
                "kg kg**-1",
            ),
            &Field::new(vec![50_000.0, 80_000.0, 100_000.0], "Pa"),
        )
        .unwrap()
    }

    #[test]
    fn test_degenerate_sounding_does_not_stop_batch() {
        let soundings = vec![
            make_test_sounding(),
            Sounding::new(),
            make_test_sounding(),
        ];

        let result = BatchProcessor::new(sequential()).process_soundings(&soundings);

        assert_eq!(result.summaries.len(), 3);
        assert_eq!(result.cloud_layers.len(), 3);
        assert!(result.summaries[1].is_missing());
        assert!(result.cloud_layers[1].is_empty());
        assert_eq!(result.summaries[0].precipitable_water(), result.summaries[2].precipitable_water());
        assert_eq!(result.metadata.num_missing, 1);

        for (i, summary) in result.summaries.iter().enumerate() {
            assert_eq!(summary.index(), i);
        }
    }

    #[test]
    fn test_summary_values_match_strategy() {
        let snd = make_test_sounding();
        let result = BatchProcessor::new(sequential()).process_soundings(&[snd.clone()]);

        let col = Column::from_sounding(&snd, &Cutoffs::none()).unwrap();
        let pw = ContinuousIntegral
            .precipitable_water(&col, IntegrationMethod::Trapz)
            .unwrap();
        let pw_sum = ContinuousIntegral
            .precipitable_water(&col, IntegrationMethod::Sum)
            .unwrap();

        let summary = result.summaries[0];
        assert_eq!(summary.precipitable_water().unwrap(), pw);
        assert_eq!(summary.precipitable_water_alt().unwrap(), pw_sum);
        assert!(approx_equal(summary.surface_temperature().unwrap().unpack(), 293.15, 1.0e-9));
    }

    #[test]
    fn test_degraded_clouds_fill_row() {
        // More temperatures than heights cannot be classified.
        let snd = Sounding::new()
            .with_height_profile(vec![some(Meters(100.0))])
            .with_temperature_profile(vec![some(Celsius(5.0)), some(Celsius(4.0))])
            .with_dew_point_profile(vec![some(Celsius(5.0)), some(Celsius(4.0))]);

        let result = BatchProcessor::new(sequential()).process_soundings(&[snd]);
        assert_eq!(result.cloud_layers[0], vec![None]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let columns: Vec<ModelColumn> = (1..=20).map(|i| model_column(i as f64 / 10.0)).collect();

        let seq = BatchProcessor::new(sequential()).process_model_columns(&columns);
        let par = BatchProcessor::new(BatchConfig::default()).process_model_columns(&columns);

        assert_eq!(seq, par);
        for pair in seq.windows(2) {
            let pw0 = pair[0].precipitable_water().unwrap().unpack();
            let pw1 = pair[1].precipitable_water().unwrap().unpack();
            assert!(pw1 > pw0);
        }
    }

    #[test]
    fn test_level_order_does_not_matter() {
        let top_down = model_column(1.0);
        let bottom_up = ModelColumn::from_fields(
            &Field::new(vec![288.0, 275.0, 260.0], "K"),
            &Field::new(vec![0.010, 0.004, 0.001], "kg kg**-1"),
            &Field::new(vec![100_000.0, 80_000.0, 50_000.0], "Pa"),
        )
        .unwrap();

        let summaries =
            BatchProcessor::new(sequential()).process_model_columns(&[top_down, bottom_up]);

        assert_eq!(summaries[0].surface_temperature().unwrap().unpack(), 288.0);
        assert_eq!(summaries[1].surface_temperature().unwrap().unpack(), 288.0);
        assert!(approx_equal(
            summaries[0].precipitable_water().unwrap().unpack(),
            summaries[1].precipitable_water().unwrap().unpack(),
            1.0e-9
        ));
    }

    #[test]
    fn test_gravity_from_latitude() {
        let column = model_column(1.0).with_latitude(90.0);

        let constant = BatchProcessor::new(sequential()).process_model_columns(&[column.clone()]);
        let local = BatchProcessor::new(BatchConfig {
            gravity_from_latitude: true,
            ..sequential()
        })
        .process_model_columns(&[column]);

        // Polar gravity is stronger than the default, less water per unit mass of air.
        let pw = constant[0].precipitable_water().unwrap().unpack();
        let pw_local = local[0].precipitable_water().unwrap().unpack();
        assert!(pw_local < pw);
        assert!(approx_equal(pw_local * gravity_at_latitude(90.0), pw * 9.79, 1.0e-9));
    }

    #[test]
    fn test_hybrid_grid_mismatch_is_missing() {
        let table = HybridLevelTable::new(vec![
            crate::hybrid::HybridLevel::new(0, 0.0, 0.0),
            crate::hybrid::HybridLevel::new(1, 0.0, 0.9),
            crate::hybrid::HybridLevel::new(2, 0.0, 1.0),
        ])
        .unwrap();

        let good = GridColumn {
            surface_pressure: 100_000.0,
            surface_pressure_unit: None,
            temperature: Field::new(vec![270.0, 285.0], "K"),
            humidity: Field::new(vec![0.004, 0.008], "kg kg**-1"),
            ..GridColumn::default()
        };
        let short = GridColumn {
            temperature: Field::new(vec![270.0], "K"),
            humidity: Field::new(vec![0.004], "kg kg**-1"),
            ..good.clone()
        };

        let summaries = BatchProcessor::new(sequential()).process_hybrid_grid(&table, &[good, short]);
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].precipitable_water().is_some());
        assert!(summaries[1].is_missing());
    }
}
