//! Listing persistence: storage backends and the write-behind worker

pub mod gateway;
pub mod writer;

pub use gateway::{JsonFileGateway, PersistenceGateway};
pub use writer::{PersistEvent, PersistWorker, RetrySettings, WriteBehind, WriterStats};
