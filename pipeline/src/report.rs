use std::fmt;

use ml_core::{FEATURE_NAMES, LinearRegression, RegressionMetrics, TARGET_NAME};

/// Qualitative reading of the held-out R².
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitQuality {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
}

impl FitQuality {
    pub fn from_r2(r2: f64) -> Self {
        if r2 > 0.9 {
            Self::Excellent
        } else if r2 > 0.8 {
            Self::Good
        } else if r2 > 0.7 {
            Self::Acceptable
        } else {
            Self::NeedsImprovement
        }
    }
}

impl fmt::Display for FitQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::NeedsImprovement => "needs improvement",
        };
        write!(f, "{s}")
    }
}

/// Metrics on both splits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub train: RegressionMetrics,
    pub test: RegressionMetrics,
}

impl Evaluation {
    pub fn quality(&self) -> FitQuality {
        FitQuality::from_r2(self.test.r2())
    }
}

/// Renders the fitted model as `price = b + w1 × size + ...`, with
/// coefficients expressed on standardized features.
pub fn equation(model: &LinearRegression) -> String {
    let mut eq = format!("{TARGET_NAME} = {:.2}", model.intercept());
    for (name, coef) in FEATURE_NAMES.iter().zip(model.coefficients()) {
        let sign = if *coef < 0.0 { '-' } else { '+' };
        eq.push_str(&format!(" {sign} {:.2} × {name}", coef.abs()));
    }
    eq
}

/// Features ordered by decreasing absolute coefficient.
pub fn ranked_coefficients(model: &LinearRegression) -> Vec<(&'static str, f64)> {
    let mut ranked: Vec<_> = FEATURE_NAMES
        .iter()
        .copied()
        .zip(model.coefficients().iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    ranked
}
