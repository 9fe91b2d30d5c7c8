mod base;
mod connection;
mod flag;
mod source;
mod sync;
mod table;

pub use base::*;
pub use connection::*;
pub use flag::*;
pub use source::*;
pub use sync::*;
pub use table::*;
