//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → schema build() methods construct profiles
//!     → Profiles shared via Arc with the dispatcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; profiles never change at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Capability selection ("type" tags) is a closed set of enum
//!   variants, not a string registry; adding a variant is a code change

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_profiles, load_config, ConfigError};
pub use schema::{DispatcherConfig, ListenerConfig, ProxyConfig};
