// Application layer - the report pipeline.
// A query is validated, its dataset loaded in one pass, rows assembled and
// grouped synchronously, and the frozen result handed to pager/renderers.

pub mod assembler;
pub mod dataset;
pub mod error;
pub mod pager;
pub mod query;
pub mod result;

pub use assembler::*;
pub use dataset::*;
pub use error::*;
pub use pager::*;
pub use query::*;
pub use result::*;
