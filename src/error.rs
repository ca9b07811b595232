// error.rs
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid vehicle count value `{0}`")]
    InvalidVehicleCount(String),
    #[error("vehicle count {count} out of range ({min}..={max})")]
    VehicleCountOutOfRange { count: u64, min: u32, max: u32 },
    #[error("cannot read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("vehicle task failed")]
    VehicleTask(#[source] tokio::task::JoinError),
    #[error("traffic light controller task failed")]
    ControllerTask(#[source] tokio::task::JoinError),
}
