pub mod pg_repository;
pub mod pool;
pub mod repository;
