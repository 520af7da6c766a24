//! File manifest building
//!
//! Before a sender streams a file it announces it with a `file-request`
//! envelope carrying a [`FileMetadata`]. This module turns the names and
//! sizes the browser reads off a `FileList`/drag-and-drop `DataTransfer`
//! into that metadata, computed the same way `SendPipeline::metadata` does,
//! without requiring a pipeline to already exist (the receiver needs to see
//! this before the sender's data is even read into memory).

use tallow_protocol::transfer::chunking;
use tallow_protocol::transfer::metadata::FileMetadata;
use wasm_bindgen::prelude::*;

/// Build the [`FileMetadata`] for a single file, for the `file-request`
/// envelope's `data` field.
#[wasm_bindgen(js_name = "buildFileMetadata")]
pub fn build_file_metadata(name: String, size: u64) -> Result<JsValue, JsValue> {
    let meta = FileMetadata {
        name,
        size,
        total_chunks: chunking::total_chunks(size),
    };
    serde_wasm_bindgen::to_value(&meta).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build metadata for every file in a batch (e.g. a multi-file drop),
/// preserving input order so the caller can zip it back against its own
/// `File` array.
#[wasm_bindgen(js_name = "buildFileManifest")]
pub fn build_file_manifest(names: Vec<String>, sizes: Vec<u64>) -> Result<JsValue, JsValue> {
    if names.len() != sizes.len() {
        return Err(JsValue::from_str("names and sizes must have the same length"));
    }
    let manifest: Vec<FileMetadata> = names
        .into_iter()
        .zip(sizes)
        .map(|(name, size)| FileMetadata {
            name,
            size,
            total_chunks: chunking::total_chunks(size),
        })
        .collect();
    serde_wasm_bindgen::to_value(&manifest).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sum of a batch's declared sizes, for a single upfront "send N files,
/// M bytes total" confirmation prompt.
#[wasm_bindgen(js_name = "manifestTotalSize")]
pub fn manifest_total_size(sizes: &[u64]) -> u64 {
    sizes.iter().sum()
}
