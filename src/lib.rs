pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod session;
pub mod store;

pub use config::Config;
pub use db::init_db;
pub use domain::{
    ExecutionSelection, InputForm, InvalidInputError, Policy, Round, Schedule, Schedules,
    SelectionScope, SplitParams, Summary,
};
pub use error::AppError;
pub use session::{SessionOptions, SimulatorSession};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
