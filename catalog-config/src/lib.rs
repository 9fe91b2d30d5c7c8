//! Configuration types and loading for the catalog syncer.
//!
//! Settings come from optional files under `configuration/`, `APP_`-prefixed environment
//! variables and finally the libpq-style `PG*` variables, in increasing order of priority.

mod environment;
mod load;
pub mod shared;

pub use environment::*;
pub use load::*;
