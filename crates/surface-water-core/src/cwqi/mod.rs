//! Comprehensive water quality index (CWQI).

pub mod engine;
pub mod index_set;
pub mod outcome;

pub use engine::{composite_index, factor_index};
pub use index_set::IndexSet;
pub use outcome::{CompositeIndex, CwqiResult};
