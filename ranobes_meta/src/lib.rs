pub mod credentials;
pub mod error;
pub mod extract;
pub mod helpers;
pub mod http;
pub mod model;
pub mod providers;
pub mod traits;

pub use credentials::Credentials;
pub use error::MetaError;
pub use extract::extract;
pub use http::*;
pub use model::*;
pub use providers::*;
pub use traits::*;
