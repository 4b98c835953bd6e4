pub mod role;
pub mod shift;
pub mod user;
pub mod worker_zone;
