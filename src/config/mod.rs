//! Configuration Module
//!
//! Construction-time settings for a sync run: credentials for both collaborators, the
//! shared content query, the destination routing mode and the failure policies.
//!
//! ## Submodules
//! - **`types`**: The configuration structs, their defaults and validation.
//! - **`env`**: Loading a configuration from environment variables.

pub mod env;
pub mod types;

#[cfg(test)]
mod tests;
