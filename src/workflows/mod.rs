mod aggregator;
mod classifier;
mod diagnostics;
mod resolver;
mod store;
mod types;

pub use aggregator::run;
pub use diagnostics::Diagnostic;
pub use types::ResolvedJob;
