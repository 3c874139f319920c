pub mod errors;
pub mod fields;
pub mod fixtures;
pub mod model;
pub mod query;
pub mod upload;

pub use errors::*;
pub use fixtures::Dataset;
pub use model::*;
pub use query::*;
pub use upload::*;
