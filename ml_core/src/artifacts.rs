use std::{
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{LinearRegression, MlError, Predictor, StandardScaler};

/// File name of the serialized model inside the artifacts directory.
pub const MODEL_FILE: &str = "modelo.json";

/// File name of the serialized scaler inside the artifacts directory.
pub const SCALER_FILE: &str = "scaler.json";

/// Failures reading or writing the artifact pair.
#[derive(Debug)]
pub enum ArtifactError {
    /// The artifact file does not exist.
    Missing { path: PathBuf },
    /// The artifact file exists but could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// The artifact file is not a valid serialized object.
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Scaler and model were fitted on a different number of features.
    Mismatch { scaler: usize, model: usize },
    /// The artifacts decode but cannot price a property (wrong width, or a
    /// scaler whose vectors disagree).
    Invalid(MlError),
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => write!(f, "artifact not found: {}", path.display()),
            Self::Io { path, source } => write!(f, "cannot access {}: {source}", path.display()),
            Self::Corrupt { path, source } => {
                write!(f, "corrupt artifact {}: {source}", path.display())
            }
            Self::Mismatch { scaler, model } => write!(
                f,
                "scaler expects {scaler} features but model expects {model}"
            ),
            Self::Invalid(e) => write!(f, "unusable artifacts: {e}"),
        }
    }
}

impl Error for ArtifactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { source, .. } => Some(source),
            Self::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

/// The directory holding the persisted `(scaler, model)` pair.
///
/// The pair is replaced wholesale on every save; there is no versioning.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    /// Writes both artifacts, creating the directory if needed and
    /// overwriting any previous pair.
    ///
    /// # Errors
    /// Returns `ArtifactError::Io` if the directory or a file cannot be written.
    pub fn save(
        &self,
        scaler: &StandardScaler,
        model: &LinearRegression,
    ) -> Result<(), ArtifactError> {
        if scaler.num_features() != model.num_features() {
            return Err(ArtifactError::Mismatch {
                scaler: scaler.num_features(),
                model: model.num_features(),
            });
        }

        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        write_json(&self.scaler_path(), scaler)?;
        write_json(&self.model_path(), model)
    }

    /// # Errors
    /// `Missing` if the file is absent, `Io` or `Corrupt` if it cannot be
    /// decoded.
    pub fn load_model(&self) -> Result<LinearRegression, ArtifactError> {
        read_json(&self.model_path())
    }

    /// # Errors
    /// Same as [`ArtifactStore::load_model`].
    pub fn load_scaler(&self) -> Result<StandardScaler, ArtifactError> {
        let scaler: StandardScaler = read_json(&self.scaler_path())?;
        scaler.check_consistent().map_err(ArtifactError::Invalid)?;
        Ok(scaler)
    }

    /// Loads both artifacts and pairs them into a [`Predictor`].
    ///
    /// # Errors
    /// Any error of the individual loads, `Mismatch` if the pair disagrees on
    /// width, or `Invalid` if both agree but cannot price a property.
    pub fn load(&self) -> Result<Predictor, ArtifactError> {
        let scaler = self.load_scaler()?;
        let model = self.load_model()?;
        let (s, m) = (scaler.num_features(), model.num_features());
        if s != m {
            return Err(ArtifactError::Mismatch { scaler: s, model: m });
        }
        Predictor::new(scaler, model).map_err(ArtifactError::Invalid)
    }
}

/// Writes `value` next to `path` first and renames it into place, so readers
/// never observe a half-written file.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
