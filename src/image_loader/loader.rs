use crate::errors::{HistError, Result};
use crate::settings::SourceConfig;
use image::{DynamicImage, ImageReader};
use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Files above this size are memory mapped instead of read into a buffer.
const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024;
/// Files above this size are rejected outright.
const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "ico", "pnm", "pbm", "pgm", "ppm",
    "tga", "qoi",
];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    File(PathBuf),
    Url(String),
}

impl ImageLocation {
    pub fn parse(id: &str) -> Self {
        if id.starts_with("http://") || id.starts_with("https://") {
            ImageLocation::Url(id.to_string())
        } else {
            ImageLocation::File(PathBuf::from(id))
        }
    }
}

impl fmt::Display for ImageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageLocation::File(path) => write!(f, "{}", path.display()),
            ImageLocation::Url(url) => f.write_str(url),
        }
    }
}

pub fn load(location: &ImageLocation, config: &SourceConfig) -> Result<DynamicImage> {
    match location {
        ImageLocation::File(path) => load_file(path),
        ImageLocation::Url(url) => {
            let bytes = fetch_url(url, config)?;
            decode_bytes(url, &bytes)
        }
    }
}

/// Decode by sniffing the content, never the file extension.
pub fn decode_bytes(source_id: &str, bytes: &[u8]) -> Result<DynamicImage> {
    let decode_err = |message: String| HistError::Decode {
        source_id: source_id.to_string(),
        message,
    };

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?;

    if reader.format().is_none() {
        return Err(decode_err("unrecognized image format".to_string()));
    }

    reader.decode().map_err(|e| decode_err(e.to_string()))
}

pub fn load_file(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(HistError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let source_id = path.display().to_string();
    let file_size = std::fs::metadata(path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(HistError::Decode {
            source_id,
            message: format!(
                "File too large: {}MB (max {}MB)",
                file_size / (1024 * 1024),
                MAX_FILE_SIZE / (1024 * 1024)
            ),
        });
    }

    log::debug!("Opening {:?} ({} bytes)", path, file_size);
    if file_size > MMAP_THRESHOLD {
        return load_memory_mapped(path, &source_id);
    }

    let bytes = std::fs::read(path)?;
    decode_bytes(&source_id, &bytes)
}

fn load_memory_mapped(path: &Path, source_id: &str) -> Result<DynamicImage> {
    use memmap2::Mmap;
    use std::fs::File;

    let file = File::open(path)?;
    // The mapping is read-only and dropped before this function returns.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| HistError::Decode {
        source_id: source_id.to_string(),
        message: format!("Memory mapping failed: {}", e),
    })?;

    decode_bytes(source_id, &mmap)
}

pub fn fetch_url(url: &str, config: &SourceConfig) -> Result<Vec<u8>> {
    log::info!("Fetching {}", url);

    let network_err = |e: reqwest::Error| {
        if e.is_timeout() {
            HistError::Timeout {
                operation: format!("fetching {}", url),
            }
        } else {
            HistError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(config.fetch_timeout())
        .user_agent(concat!("histview/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(network_err)?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(network_err)?;

    let mut bytes = Vec::new();
    response
        .take(MAX_FILE_SIZE)
        .read_to_end(&mut bytes)
        .map_err(|e| HistError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    Ok(bytes)
}
