//! # sql-lister
//!
//! Normalizes untrusted list parameters (page, page size, sort fields,
//! search text and filters) against a server-side [`Policy`], computes
//! pagination once the total row count is known, and renders a
//! dialect-specific ` ORDER BY … LIMIT … OFFSET …` fragment.
//!
//! ## Core Types
//!
//! - **[`Policy`]**: Allowed/default page sizes and sort fields plus the SQL dialect
//! - **[`Lister`]**: Per-request query state and pagination arithmetic
//! - **[`ListerParams`]**: Raw client parameters, decodable from JSON or Base64-URL JSON
//! - **[`SqlDialect`]**: PostgreSQL or MySQL clause rendering
//! - **[`Error`]**: Decode errors; policy violations are coerced, never errors
//!
//! Nothing here executes SQL; the rendered clause is appended to a query
//! the caller runs itself.

mod cast;
mod dialect;
mod error;
mod lister;
mod order;
mod params;
mod policy;
mod sort;

pub use cast::Caster;
pub use dialect::SqlDialect;
pub use error::{DecodeFailure, Error, Result};
pub use lister::{Lister, Values};
pub use order::Order;
pub use params::ListerParams;
pub use policy::{Policy, PolicyBuilder, PolicyConfig};
pub use sort::Sort;
