mod plan;
mod reconciler;

pub use plan::*;
pub use reconciler::*;
