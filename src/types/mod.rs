//! Core data types shared across the analysis pipeline and its consumers.

mod declaration;
mod report;

pub use declaration::{Declaration, SourceKind};
pub use report::{
    AnalysisResult, CategorizedColor, ColorEntry, ContrastContext, ExtractionStats, FontEntry,
    Summary,
};
