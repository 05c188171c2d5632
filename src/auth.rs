//! Administrator credentials, redacted secrets, and the bearer token issued at connect time.

pub mod credentials;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use secret::*;
pub use token::*;
