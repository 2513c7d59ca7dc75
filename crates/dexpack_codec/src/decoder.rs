//! Container file decoder seam.

use crate::class::ClassFile;
use crate::error::CodecResult;

/// Parses a container file from bytes.
///
/// The decoder is the read-side codec collaborator: dexpack hands it raw
/// bytes (from a file on disk or an in-memory buffer) and receives a parsed
/// [`ClassFile`] back, never looking at the layout itself.
pub trait FileDecoder {
    /// The parsed file type this decoder produces.
    type File: ClassFile;

    /// Parses one container starting at `offset` within `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes at `offset` are not a valid container.
    fn parse(&self, data: &[u8], offset: usize) -> CodecResult<Self::File>;
}
