pub mod availability;
pub mod lifecycle;
pub mod memory;
pub mod models;
pub mod repository;
