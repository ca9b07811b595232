// sync/mod.rs
pub mod semaphore;

pub use semaphore::Semaphore;
