pub mod job;
pub mod meeting;
pub mod session;
pub mod task;
