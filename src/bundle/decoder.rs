// In: src/bundle/decoder.rs

//! The configured, reusable decoder. Holds a shared `Arc<DecoderConfig>` and
//! applies it to every archive it decodes; it keeps no other state.

use std::sync::Arc;

use ndarray::Array2;

use crate::bundle::archive::ArchiveReader;
use crate::bundle::summary::{ArrayInfo, BundleSummary};
use crate::config::{DecoderConfig, MalformedEntryPolicy};
use crate::error::BundleError;
use crate::kernels::{mask, npy};
use crate::traits::{MaskAdapter, NdarrayMasks};
use crate::types::{ArchiveBundle, DecodedArray, Dtype, MaskSet};

#[derive(Debug, Clone, Default)]
pub struct BundleDecoder {
    config: Arc<DecoderConfig>,
}

impl BundleDecoder {
    /// A decoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Arc<DecoderConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes every array entry of a zip archive.
    ///
    /// Entries not ending with `entry_suffix` are ignored. A failing entry aborts
    /// the whole call or is skipped, per `on_malformed_entry`.
    ///
    /// # Errors
    /// * `ArchiveFormat` if the bytes are not a zip container.
    /// * `Entry { entry, source }` for the first failing entry under `Abort`.
    pub fn decode(&self, archive_bytes: &[u8]) -> Result<ArchiveBundle, BundleError> {
        let mut reader = ArchiveReader::open(archive_bytes)?;
        let entries = reader.array_entries(&self.config.entry_suffix);
        log::debug!(
            "Archive has {} entries, {} matching '{}'",
            reader.len(),
            entries.len(),
            self.config.entry_suffix
        );

        let mut bundle = ArchiveBundle::new();
        for (index, name) in entries {
            let result = reader
                .read_entry(index, self.config.max_entry_len)
                .and_then(|payload| self.decode_entry(&payload));

            match result {
                Ok(array) => bundle.insert(name, array),
                Err(e) => self.handle_malformed(&name, e)?,
            }
        }

        log_metric!("event" = "decode_bundle", "arrays" = bundle.len());
        Ok(bundle)
    }

    /// Decodes a single entry payload with this decoder's configuration.
    pub fn decode_entry(&self, payload: &[u8]) -> Result<DecodedArray, BundleError> {
        npy::decode_array_with(payload, &self.config)
    }

    /// Reads every array entry's header and reports shapes, dtypes and
    /// truncation without converting any payload.
    pub fn analyze(&self, archive_bytes: &[u8]) -> Result<BundleSummary, BundleError> {
        let mut reader = ArchiveReader::open(archive_bytes)?;
        let mut summary = BundleSummary::default();

        for (index, name) in reader.array_entries(&self.config.entry_suffix) {
            let result = reader
                .read_entry(index, self.config.max_entry_len)
                .and_then(|payload| {
                    let info = npy::peek_header(&payload, &self.config)?;
                    let width = Dtype::parse(&info.fields.descr)?
                        .element_kind()?
                        .byte_width();
                    Ok((info, width))
                });

            match result {
                Ok((info, width)) => summary.arrays.push(ArrayInfo::from_header(name, info, width)),
                Err(e) => {
                    self.handle_malformed(&name, e)?;
                    summary.skipped.push(name);
                }
            }
        }

        summary.arrays.sort_by(|a, b| a.name.cmp(&b.name));
        summary.skipped.sort();
        Ok(summary)
    }

    /// Converts a decoded array into `Array2<u8>` masks using the configured levels
    /// and fill limit.
    pub fn masks(&self, decoded: &DecodedArray) -> Result<MaskSet<Array2<u8>>, BundleError> {
        self.masks_with(decoded, &NdarrayMasks::new(self.config.mask_levels))
    }

    /// Converts a decoded array into masks built by a caller-supplied adapter.
    pub fn masks_with<A: MaskAdapter>(
        &self,
        decoded: &DecodedArray,
        adapter: &A,
    ) -> Result<MaskSet<A::Mask>, BundleError> {
        mask::to_mask_set_bounded(decoded, adapter, self.config.max_mask_fill)
    }

    /// Applies the malformed-entry policy: `Err` to abort, `Ok` to carry on.
    fn handle_malformed(&self, name: &str, error: BundleError) -> Result<(), BundleError> {
        match self.config.on_malformed_entry {
            MalformedEntryPolicy::Abort => Err(error.in_entry(name)),
            MalformedEntryPolicy::Skip => {
                log::warn!("Skipping malformed entry '{}': {}", name, error);
                Ok(())
            }
        }
    }
}
