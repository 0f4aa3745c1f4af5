//! Domain types shared by the secret resolver, the database layer, and the
//! job binary.

pub mod credentials;
pub mod error;
pub mod procedure;
