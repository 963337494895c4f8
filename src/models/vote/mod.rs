pub mod allocation;
pub mod queries;
pub mod types;

pub use allocation::*;
pub use queries::*;
pub use types::*;
