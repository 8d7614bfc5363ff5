//! Stanza Config - schema-driven configuration loading
//!
//! Populates an arbitrary, possibly-nested record from a sectioned
//! key/value file. The record's shape is declared once with an explicit
//! [`Schema`]; the loader resolves section and key names through it and
//! coerces each value to its declared primitive kind. Unknown sections and
//! keys are tolerated; malformed lines abort the load with the offending
//! line number.
//!
//! # Example
//!
//! ```rust,no_run
//! use stanza_config::{Schema, load};
//!
//! #[derive(Debug, Default)]
//! struct MysqlConfig {
//!     address: String,
//!     port: i64,
//! }
//!
//! #[derive(Debug, Default)]
//! struct AppConfig {
//!     mysql: MysqlConfig,
//! }
//!
//! fn main() -> Result<(), stanza_config::LoadError> {
//!     let schema = Schema::<AppConfig>::builder()
//!         .section("mysql", |c: &mut AppConfig| &mut c.mysql, |s| {
//!             s.text("address", |m: &mut MysqlConfig, v| m.address = v)
//!                 .integer("port", |m, v| m.port = v)
//!         })
//!         .build()?;
//!
//!     let mut config = AppConfig::default();
//!     load("conf.ini", &schema, &mut config)?;
//!     Ok(())
//! }
//! ```

#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod schema;

// Re-export main types
pub use error::{LoadError, LoadResult, LoadResultExt};
pub use loader::{Loader, load, load_str};
pub use schema::{Schema, SchemaBuilder, SectionBuilder, ValueKind};

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude for common imports
    //!
    //! # Example
    //! ```rust
    //! use stanza_config::prelude::*;
    //! ```

    pub use crate::error::{LoadError, LoadResult, LoadResultExt};
    pub use crate::loader::{Loader, load, load_str};
    pub use crate::schema::{Schema, SchemaBuilder, SectionBuilder, ValueKind};
}
