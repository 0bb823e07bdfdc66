//! Persistence gateway: parameterized single-statement execution against Postgres.

pub mod postgres;
pub mod statements;
pub mod traits;

pub use postgres::{ConnectionSource, PerCallConnections, PgStore, PooledConnections, ScopedConnection};
pub use traits::{SqlParam, Statement, Store, Upsert};
