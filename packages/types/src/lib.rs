mod error;
mod interest_rate_model;
mod market;
mod math;
mod oracle;
mod rebase;
mod token;

pub use error::*;
pub use interest_rate_model::*;
pub use market::*;
pub use math::*;
pub use oracle::*;
pub use rebase::*;
pub use token::*;
