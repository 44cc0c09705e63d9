//! Package serialization

mod epub;

pub use epub::EpubEncoder;

use crate::error::ConversionError;
use crate::types::EpubPackage;
use std::io::Write;

/// Trait for serializing assembled packages
pub trait Encoder: Send + Sync {
    /// Encode a package to a writer
    fn encode(&self, package: &EpubPackage, writer: &mut dyn Write) -> Result<(), ConversionError>;

    /// Encode into a fresh buffer
    fn encode_to_vec(&self, package: &EpubPackage) -> Result<Vec<u8>, ConversionError> {
        let mut buffer = Vec::new();
        self.encode(package, &mut buffer)?;
        Ok(buffer)
    }
}
