//! Postgres persistence, one module per aggregate. All functions are
//! free-standing and take the pool directly; callers own transactionality
//! by sequencing writes (content rows first, session row last).

pub mod jobs;
pub mod meetings;
pub mod sessions;
pub mod tasks;
