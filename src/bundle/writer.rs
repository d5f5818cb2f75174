// In: src/bundle/writer.rs

//! Archive writing: bundles `.npy` entries into a deflate-compressed zip.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::BundleError;
use crate::format::DEFAULT_ENTRY_SUFFIX;
use crate::kernels::writer::encode_array;
use crate::types::DecodedArray;

/// Writes each `(path, bytes)` pair as a deflated zip entry, in order.
pub fn write_archive<'a, I>(files: I) -> Result<Vec<u8>, BundleError>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, bytes) in files {
        writer.start_file(path, options)?;
        writer.write_all(bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Encodes named arrays as `<name>.npy` entries of a new archive.
pub fn encode_bundle<'a, I>(arrays: I) -> Result<Vec<u8>, BundleError>
where
    I: IntoIterator<Item = (&'a str, &'a DecodedArray)>,
{
    let entries = arrays
        .into_iter()
        .map(|(name, array)| Ok((format!("{}{}", name, DEFAULT_ENTRY_SUFFIX), encode_array(array)?)))
        .collect::<Result<Vec<(String, Vec<u8>)>, BundleError>>()?;

    write_archive(
        entries
            .iter()
            .map(|(path, bytes)| (path.as_str(), bytes.as_slice())),
    )
}
