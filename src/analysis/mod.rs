//! The extraction core: everything between declaration records and the
//! finished [`crate::types::AnalysisResult`].
//!
//! - Color normalization across hex/rgb/hsl/named syntaxes
//! - CSS variable resolution and `var()` substitution
//! - Semantic categorization by selector/property keywords
//! - WCAG contrast math and opportunistic text/background pairing
//! - Block-wise font aggregation
//!
//! Everything here is synchronous and runtime-free; fetching and parsing
//! happen upstream.

// Submodules
mod category;
mod collector;
pub mod color;
pub mod contrast;
mod extract;
pub mod fonts;
mod variables;

#[cfg(test)]
mod tests;

// Re-exports
pub use category::{Categorizer, Category, CategoryRule};
pub use collector::StyleCollector;
pub use contrast::ContrastVerdict;
pub use extract::{Analysis, Analyzer};
pub use variables::{ResolvedVariables, Substitution, VariableResolver, VarSpan};
