use std::{error::Error, fmt, ops::RangeInclusive};

use ml_core::Features;

pub const SIZE_RANGE: RangeInclusive<f64> = 40.0..=120.0;
pub const BEDROOMS_RANGE: RangeInclusive<f64> = 1.0..=5.0;
pub const AGE_RANGE: RangeInclusive<f64> = 1.0..=35.0;

/// A feature value the model was never meant to price.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotFinite { feature: &'static str },
    OutOfRange { feature: &'static str, value: f64 },
}

impl ValidationError {
    pub fn feature(&self) -> &'static str {
        match self {
            Self::NotFinite { feature } | Self::OutOfRange { feature, .. } => feature,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite { feature } => write!(f, "{feature} must be a finite number"),
            Self::OutOfRange { feature, .. } => {
                let (range, unit) = bounds(feature);
                write!(
                    f,
                    "{feature} must be between {} and {}{unit}",
                    range.start(),
                    range.end()
                )
            }
        }
    }
}

impl Error for ValidationError {}

fn bounds(feature: &str) -> (RangeInclusive<f64>, &'static str) {
    match feature {
        "size" => (SIZE_RANGE, " m²"),
        "bedrooms" => (BEDROOMS_RANGE, ""),
        _ => (AGE_RANGE, " years"),
    }
}

/// Checks every feature against its serving range, bounds inclusive.
///
/// Features are checked in column order and the first offending one is
/// reported.
///
/// # Errors
/// `ValidationError` naming the first invalid feature.
pub fn validate(features: &Features) -> Result<(), ValidationError> {
    let checks = [
        ("size", features.size),
        ("bedrooms", features.bedrooms),
        ("age", features.age),
    ];

    for (feature, value) in checks {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { feature });
        }
        if !bounds(feature).0.contains(&value) {
            return Err(ValidationError::OutOfRange { feature, value });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(size: f64, bedrooms: f64, age: f64) -> Result<(), ValidationError> {
        validate(&Features::new(size, bedrooms, age))
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(check(40.0, 1.0, 1.0).is_ok());
        assert!(check(120.0, 5.0, 35.0).is_ok());
    }

    #[test]
    fn just_outside_is_rejected() {
        assert_eq!(check(39.0, 3.0, 10.0).unwrap_err().feature(), "size");
        assert_eq!(check(121.0, 3.0, 10.0).unwrap_err().feature(), "size");
        assert_eq!(check(80.0, 0.0, 10.0).unwrap_err().feature(), "bedrooms");
        assert_eq!(check(80.0, 6.0, 10.0).unwrap_err().feature(), "bedrooms");
        assert_eq!(check(80.0, 3.0, 0.0).unwrap_err().feature(), "age");
        assert_eq!(check(80.0, 3.0, 36.0).unwrap_err().feature(), "age");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            check(f64::NAN, 3.0, 10.0),
            Err(ValidationError::NotFinite { feature: "size" })
        );
        assert!(check(80.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn first_offending_feature_wins() {
        assert_eq!(check(10.0, 9.0, 99.0).unwrap_err().feature(), "size");
    }

    #[test]
    fn messages_name_the_range() {
        let err = check(200.0, 3.0, 10.0).unwrap_err();
        assert_eq!(err.to_string(), "size must be between 40 and 120 m²");

        let err = check(80.0, 7.0, 10.0).unwrap_err();
        assert_eq!(err.to_string(), "bedrooms must be between 1 and 5");

        let err = check(80.0, 3.0, 50.0).unwrap_err();
        assert_eq!(err.to_string(), "age must be between 1 and 35 years");
    }
}
