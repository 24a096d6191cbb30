use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistError {
    #[error("Failed to decode image '{source_id}': {message}")]
    Decode { source_id: String, message: String },

    #[error("Network error fetching '{url}': {message}")]
    Network { url: String, message: String },

    #[error("Cannot read image folder '{path}': {message}")]
    DirectoryRead { path: PathBuf, message: String },

    #[error("Failed to encode histogram plot: {message}")]
    Encode { message: String },

    #[error("Failed to render page: {message}")]
    Template { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Timeout error: {operation}")]
    Timeout { operation: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, HistError>;

impl HistError {
    /// Returns true if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HistError::FileNotFound { .. }
                | HistError::Network { .. }
                | HistError::Timeout { .. }
                | HistError::Cancelled
                | HistError::Io { .. }
        )
    }

    /// Returns a user-friendly error message with a recovery suggestion
    pub fn user_message(&self) -> String {
        let base_message = self.to_string();
        let suggestion = match self {
            HistError::Decode { .. } => "The file may be corrupted or is not a PNG/JPEG image.",
            HistError::Network { .. } => "Check the URL and your internet connection and try again.",
            HistError::DirectoryRead { .. } => "Check that the folder exists and is readable.",
            HistError::FileNotFound { .. } => "Check if the file exists and you have permission to access it.",
            HistError::Timeout { .. } => "The remote server took too long to respond. Try again later.",
            HistError::Config { .. } => "Fix the configuration file or command-line flags.",
            HistError::Json { .. } => "The configuration file is not valid JSON.",
            _ => "An unexpected error occurred.",
        };

        format!("{}\n\n{}", base_message, suggestion)
    }

    /// Returns an error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HistError::Decode { .. } => "DECODE_ERROR",
            HistError::Network { .. } => "NETWORK_ERROR",
            HistError::DirectoryRead { .. } => "DIRECTORY_READ_ERROR",
            HistError::Encode { .. } => "ENCODE_ERROR",
            HistError::Template { .. } => "TEMPLATE_ERROR",
            HistError::FileNotFound { .. } => "FILE_NOT_FOUND",
            HistError::Timeout { .. } => "TIMEOUT",
            HistError::Cancelled => "CANCELLED",
            HistError::Config { .. } => "CONFIG_ERROR",
            HistError::ThreadPool { .. } => "THREAD_POOL_ERROR",
            HistError::Io { .. } => "IO_ERROR",
            HistError::Json { .. } => "JSON_ERROR",
        }
    }
}
