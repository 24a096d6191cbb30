use crate::errors::{HistError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A rendered plot ready for inline embedding, tagged with its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    pub source: String,
    pub data_uri: String,
}

pub fn encode_png(plot: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    plot.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| HistError::Encode {
            message: e.to_string(),
        })?;
    Ok(bytes)
}

/// `data:image/png;base64,<payload>`
pub fn to_data_uri(plot: &RgbaImage) -> Result<String> {
    let png = encode_png(plot)?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(png)))
}
