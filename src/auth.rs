//! Credential-domain types: redacted secrets, consent URLs, and token endpoint payloads.

pub mod consent;
pub mod secret;
pub mod token;

pub use consent::*;
pub use secret::*;
pub use token::*;
