mod helpers;
mod mock_issuer;

pub use helpers::*;
pub use mock_issuer::*;
