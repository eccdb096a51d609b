pub mod analysis;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;

pub use analysis::pipeline::{AnalysisReport, CycleStages, analyze};
pub use config::AnalysisConfig;
pub use data::model::{Recording, SpecimenGeometry};
pub use error::AnalysisError;
