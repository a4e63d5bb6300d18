use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};

use crate::config::{Gamma, SvmConfig};
use crate::data_handling::FEATURE_NAMES;
use crate::error::{CallzoneError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::preprocessing::scale_gamma;

/// RBF-kernel support vector classifier backed by `linfa-svm`.
pub struct SvmClassifier {
    model: Option<Svm<f64, bool>>,
    params: SvmConfig,
    /// Gamma actually used by the last fit, after resolving `Gamma::Scale`.
    fitted_gamma: Option<f64>,
}

impl SvmClassifier {
    pub fn new(params: SvmConfig) -> Self {
        SvmClassifier {
            model: None,
            params,
            fitted_gamma: None,
        }
    }

    pub fn fitted_gamma(&self) -> Option<f64> {
        self.fitted_gamma
    }

    pub fn n_support_vectors(&self) -> Option<usize> {
        self.model.as_ref().map(|m| m.nsupport())
    }

    fn check_width(x: &Array2<f64>) -> Result<()> {
        if x.ncols() != FEATURE_NAMES.len() {
            return Err(CallzoneError::ShapeMismatch {
                expected: FEATURE_NAMES.len(),
                found: x.ncols(),
            });
        }
        Ok(())
    }
}

impl ClassifierModel for SvmClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()> {
        Self::check_width(x)?;
        if x.nrows() != y.len() {
            return Err(CallzoneError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        match y.first() {
            None => return Err(CallzoneError::InsufficientData { rows: 0 }),
            Some(&first) if y.iter().all(|&label| label == first) => {
                return Err(CallzoneError::SingleClass(first));
            }
            Some(_) => {}
        }

        let gamma = match self.params.gamma {
            Gamma::Scale(_) => scale_gamma(x),
            Gamma::Value(g) => g,
        };
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(CallzoneError::Fit(format!("gamma must be positive, got {}", gamma)));
        }

        // linfa's Gaussian kernel is exp(-|a - b|^2 / eps)
        let kernel_eps = 1.0 / gamma;
        let c = self.params.c;

        log::trace!(
            "Fitting RBF SVM on {} rows (gamma={}, C={})",
            x.nrows(),
            gamma,
            c
        );

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let model = Svm::<f64, bool>::params()
            .eps(self.params.eps)
            .pos_neg_weights(c, c)
            .gaussian_kernel(kernel_eps)
            .fit(&dataset)?;

        self.model = Some(model);
        self.fitted_gamma = Some(gamma);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Self::check_width(x)?;
        let model = self.model.as_ref().ok_or(CallzoneError::NotFitted)?;
        let predicted: Array1<bool> = model.predict(x);
        Ok(predicted)
    }

    fn name(&self) -> &str {
        "rbf-svm"
    }
}
