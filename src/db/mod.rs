//! Relational storage for users and roles.
//!
//! - **Turso/SQLite** via libsql: users, the role catalog, soft deletes
//! - [`traits::UserRepository`] is the seam the credential store talks to

pub mod traits;
pub mod turso;

pub use traits::{DatabaseProvider, NewUserRecord, UserChanges, UserRepository};
pub use turso::TursoClient;
