pub mod assignment;
pub mod common;
pub mod diagnostics;
pub mod program;
pub mod solution;
pub mod table;

pub use assignment::*;
pub use common::*;
pub use diagnostics::*;
pub use program::*;
pub use solution::*;
pub use table::*;
