//! CoffeeWild order session library.
//!
//! Drives the CoffeeWild order lifecycle through database stored procedures:
//! create an order, mark it delivered, register its payment, then dump the
//! order summary view. All business logic lives database-side; this crate is
//! the session and orchestration layer.

pub mod config;
pub mod db;
pub mod error;
pub mod flow;

pub use config::Config;
pub use db::{PedidoOps, Session};
pub use error::SessionError;
