//! Pipeline module - data preparation and the deal-closure model

pub mod encoder;
pub mod error;
pub mod loader;
pub mod logistic;
pub mod missing;
pub mod model;
pub mod prepare;
pub mod schema;
pub mod split;
pub mod target;

pub use encoder::*;
pub use error::PrepareError;
pub use loader::*;
pub use logistic::{ClassWeight, LogisticRegression};
pub use missing::*;
pub use model::*;
pub use prepare::*;
pub use schema::*;
pub use split::*;
pub use target::*;
