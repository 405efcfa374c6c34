//! # mzsql
//!
//! Statement builders and catalog scanners for Materialize objects.
//!
//! Every object kind follows the same shape:
//!
//! - a configuration struct (`KafkaConfig`, `TypeConfig`, ...) that renders
//!   its `CREATE` statement through [`CreateStatement`]
//! - the shared rename / owner / comment / drop statements in [`ddl`]
//! - a `<kind>_id` lookup by qualified name and a `scan_<kind>` read by id
//!
//! Statements run through the [`Executor`] capability, so the same code
//! drives a live connection ([`pg::PgExecutor`]) or a recording
//! [`mock::MockExecutor`].
//!
//! ```
//! use mzsql::{DdlBuilder, MaterializeObject, ObjectType};
//! use mzsql::connection::SshTunnelConfig;
//! use mzsql::mock::MockExecutor;
//!
//! let exec = MockExecutor::new();
//! let object = MaterializeObject::new(ObjectType::Connection, "tunnel");
//! let builder = DdlBuilder::new(&exec, object);
//! builder.create(&SshTunnelConfig {
//!     host: "bastion".into(),
//!     user: "mz".into(),
//!     port: 22,
//!     validate: true,
//! })?;
//! assert_eq!(exec.statements().len(), 1);
//! # Ok::<(), mzsql::Error>(())
//! ```

pub mod catalog;
pub mod connection;
pub mod custom_type;
pub mod ddl;
pub mod error;
pub mod executor;
pub mod mock;
pub mod object;
pub mod pg;
pub mod query;
pub mod quote;
pub mod secret;
pub mod webhook;

pub use catalog::{ObjectParams, read_id};
pub use ddl::{CreateStatement, DdlBuilder};
pub use error::{Error, ErrorCategory, Result};
pub use executor::{Cell, Executor, Row};
pub use object::{IdentifierSchema, MaterializeObject, ObjectType, ValueSecret};
pub use query::BaseQuery;
pub use quote::{qualified_name, quote_identifier, quote_string};
