//! Reading and writing static snapshot files.

use anyhow::{bail, Context};
use eco_core::snapshot::Snapshot;
use serde_json::Value;

/// Read a JSON document from disk.
pub async fn read_document(path: &str) -> anyhow::Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path))
}

/// Write a JSON document back as pretty-printed text.
pub async fn write_document(path: &str, document: &Value) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("failed to write {}", path))
}

/// Read a snapshot file whose root holds the dataset keys.
pub async fn load_snapshot(path: &str) -> anyhow::Result<Snapshot> {
    let document = read_document(path).await?;
    if !document.is_object() {
        bail!("snapshot {} must be a JSON object", path);
    }
    Ok(Snapshot::from_root(&document))
}
