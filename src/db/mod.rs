//! Storage layer for the lab.
//!
//! Layout:
//! - `connection.rs`: per-call connection provider (pragmas + `SLEEP`)
//! - `sleep.rs`: the `SLEEP(seconds)` SQL function
//! - `schema.rs`: SQL DDL and fixture rows
//! - `statement.rs`: first-statement boundary of a SQL text
//! - `bootstrap.rs`: directory provisioning, schema init, reset

pub mod bootstrap;
pub mod connection;
pub mod schema;
pub mod sleep;
pub mod statement;

pub use connection::ConnectionProvider;
pub use schema::SQLITE_INIT;
