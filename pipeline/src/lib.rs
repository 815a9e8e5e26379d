//! Offline training: CSV in, `(scaler, model)` artifact pair out.
//!
//! The run is strictly sequential: load, clean, split, fit the scaler on the
//! training split only, fit ordinary least squares on the scaled training
//! split, evaluate on both splits and persist. Nothing is written unless every
//! earlier step succeeded.

pub mod config;
pub mod error;
pub mod load;
pub mod prepare;
pub mod report;
pub mod split;

use ml_core::{
    ArtifactStore, Features, LinearRegression, Observation, Predictor, RegressionMetrics,
    StandardScaler, to_design,
};

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use prepare::CleaningReport;
pub use report::{Evaluation, FitQuality};

/// Houses priced right after training to smoke-test the written artifacts.
pub const REFERENCE_HOUSES: [(&str, Features); 4] = [
    ("medium house", Features::new(80.0, 3.0, 15.0)),
    ("large new house", Features::new(120.0, 5.0, 5.0)),
    ("small old apartment", Features::new(50.0, 1.0, 25.0)),
    ("large fairly new house", Features::new(100.0, 4.0, 10.0)),
];

/// Scaler, model and their evaluation, before anything touches disk.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    pub scaler: StandardScaler,
    pub model: LinearRegression,
    pub evaluation: Evaluation,
    pub train_rows: usize,
    pub test_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePrediction {
    pub label: &'static str,
    pub features: Features,
    pub price: f64,
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub cleaning: CleaningReport,
    pub fitted: FittedPipeline,
    pub store: ArtifactStore,
    pub samples: Vec<SamplePrediction>,
}

/// Splits cleaned observations, fits scaler and model on the training part
/// and evaluates on both parts.
///
/// # Errors
/// `PipelineError::NotEnoughRows` if the split leaves a side empty, or
/// `PipelineError::Ml` if fitting fails.
pub fn fit(observations: &[Observation], test_size: f64, seed: u64) -> Result<FittedPipeline> {
    let split = split::train_test_split(observations, test_size, seed)?;
    log::info!(
        "split into {} training and {} test rows (seed {seed})",
        split.train.len(),
        split.test.len()
    );

    let (x_train, y_train) = to_design(&split.train);
    let (x_test, y_test) = to_design(&split.test);

    let scaler = StandardScaler::fit(x_train.view())?;
    let x_train = scaler.transform(x_train.view())?;
    let x_test = scaler.transform(x_test.view())?;

    let model = LinearRegression::fit(x_train.view(), y_train.view())?;
    log::info!("fitted {}", report::equation(&model));

    let train_pred = model.predict(x_train.view())?;
    let test_pred = model.predict(x_test.view())?;
    let evaluation = Evaluation {
        train: RegressionMetrics::compute(y_train.view(), train_pred.view())?,
        test: RegressionMetrics::compute(y_test.view(), test_pred.view())?,
    };

    Ok(FittedPipeline {
        scaler,
        model,
        evaluation,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

/// Prices every reference house with `predictor`.
///
/// # Errors
/// Propagates shape errors from the predictor.
pub fn sample_predictions(predictor: &Predictor) -> Result<Vec<SamplePrediction>> {
    REFERENCE_HOUSES
        .iter()
        .map(|&(label, features)| -> Result<SamplePrediction> {
            Ok(SamplePrediction {
                label,
                features,
                price: predictor.predict(&features)?,
            })
        })
        .collect()
}

/// Runs the whole pipeline described by `config`.
///
/// # Errors
/// Any `PipelineError`; artifacts are only written after a successful fit.
pub fn run(config: &PipelineConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    let table = load::load_table(&config.data_path)?;
    let (observations, cleaning) = prepare::clean(table)?;
    log::info!(
        "{} of {} rows left after cleaning",
        cleaning.output_rows,
        cleaning.input_rows
    );

    let fitted = fit(&observations, config.test_size, config.seed)?;
    log_evaluation(&fitted);

    let store = ArtifactStore::new(&config.artifacts_dir);
    store.save(&fitted.scaler, &fitted.model)?;
    log::info!("artifacts written to {}", store.dir().display());

    let predictor = store.load()?;
    let samples = sample_predictions(&predictor)?;
    for s in &samples {
        log::info!(
            "{}: {}m², {} bedrooms, {} years -> {:.0}k",
            s.label,
            s.features.size,
            s.features.bedrooms,
            s.features.age,
            s.price
        );
    }

    Ok(TrainingOutcome {
        cleaning,
        fitted,
        store,
        samples,
    })
}

fn log_evaluation(fitted: &FittedPipeline) {
    let Evaluation { train, test } = fitted.evaluation;
    log::info!("r2 train={:.4} test={:.4}", train.r2(), test.r2());
    log::info!("rmse train={:.2} test={:.2}", train.rmse(), test.rmse());
    log::info!("mae train={:.2} test={:.2}", train.mae(), test.mae());
    log::info!(
        "model explains {:.1}% of price variance on held-out data ({})",
        test.r2() * 100.0,
        fitted.evaluation.quality()
    );
    for (name, coef) in report::ranked_coefficients(&fitted.model) {
        log::debug!("coefficient {name}: {coef:.4}");
    }
}
