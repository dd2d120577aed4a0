use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't reach the page at {url}: {reason}")]
    Navigation { url: String, reason: String },
    #[error("The page has no entity name. Selector: {0}")]
    MissingEntityName(String),
    #[error("Entity name {0:?} can't be used as an output file name")]
    InvalidOutputName(String),

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    InvalidSelector(String),
    #[error("Script {0:?} didn't return a number")]
    ScriptValue(String),
    #[error("Browser Error: {0}")]
    Browser(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
}
