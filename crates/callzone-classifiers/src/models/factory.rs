use crate::config::{Gamma, SvmConfig};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::svm::SvmClassifier;

/// Build a boxed, unfitted classifier from an `SvmConfig`.
pub fn build_model(params: &SvmConfig) -> Box<dyn ClassifierModel> {
    Box::new(SvmClassifier::new(params.clone()))
}

/// Build the classifier for one grid cell, keeping the grid's solver tolerance.
pub fn build_grid_model(gamma: u32, c: u32, eps: f64) -> Box<dyn ClassifierModel> {
    let params = SvmConfig {
        gamma: Gamma::Value(f64::from(gamma)),
        c: f64::from(c),
        eps,
    };
    build_model(&params)
}
