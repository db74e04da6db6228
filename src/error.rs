use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabsiftError {
    #[error("No dataset loaded.")]
    NotLoaded,
    #[error("Column '{name}' not found.")]
    ColumnNotFound { name: String },
    #[error("Parse error: {message}")]
    Parse { message: String },
    #[error("Type error: {0}")]
    Type(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TabsiftError>;

// Helper conversions
impl From<rusqlite::Error> for TabsiftError {
    fn from(e: rusqlite::Error) -> Self { Self::Query(e.to_string()) }
}

impl From<csv::Error> for TabsiftError {
    fn from(e: csv::Error) -> Self { Self::Parse { message: e.to_string() } }
}
