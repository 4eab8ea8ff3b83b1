//! Database access layer.
//!
//! - Session management (one connection, no pooling)
//! - Transactional stored-procedure commands
//! - Untyped row capture for the summary view

pub mod ops;
pub mod rows;
pub mod session;

pub use ops::PedidoOps;
pub use rows::Fila;
pub use session::Session;
