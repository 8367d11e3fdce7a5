//! Typed views over the built-in resources.

pub mod requests;
pub mod sign_template;
pub mod templates;

pub use requests::*;
pub use sign_template::*;
pub use templates::*;
