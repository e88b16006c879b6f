//! In-place cleanups and audits of a snapshot file.

use crate::snapshot_io::{read_document, write_document};
use eco_core::cleanup::{normalize_flood_flags, numeric_flood_samples, strip_synthetic};
use log::info;

/// Rewrite boolean flood flags to 1/0. Returns the number changed.
pub async fn run_normalize_floods(snapshot_path: &str) -> anyhow::Result<usize> {
    let mut document = read_document(snapshot_path).await?;
    let changed = normalize_flood_flags(&mut document);
    if changed > 0 {
        write_document(snapshot_path, &document).await?;
    }
    info!("Converted {} flood flags in {}", changed, snapshot_path);
    Ok(changed)
}

/// Remove synthetic-data markers. Returns the number of keys removed.
pub async fn run_strip_synthetic(snapshot_path: &str) -> anyhow::Result<usize> {
    let mut document = read_document(snapshot_path).await?;
    let removed = strip_synthetic(&mut document);
    if removed > 0 {
        write_document(snapshot_path, &document).await?;
    }
    info!("Removed {} synthetic fields from {}", removed, snapshot_path);
    Ok(removed)
}

/// Count E.coli samples stored with numeric flood flag and count.
pub async fn run_count_flood_samples(snapshot_path: &str) -> anyhow::Result<usize> {
    let document = read_document(snapshot_path).await?;
    let samples = numeric_flood_samples(&document);
    println!(
        "Samples with numeric flood_in_month and Ecoli: {}",
        samples.len()
    );
    for sample in samples.iter().take(5) {
        println!(
            "  {} month {}: flood_in_month={} Ecoli={}",
            sample.year, sample.month_key, sample.flood_in_month, sample.ecoli
        );
    }
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn snapshot_file(dir: &tempfile::TempDir, value: &Value) -> String {
        let path = dir.path().join("db.json");
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn reread(path: &str) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn normalize_floods_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_file(
            &dir,
            &json!({ "Ecolifloods": { "2020": [{ "01": [
                { "Ecoli": 1, "flood_in_month": true },
                { "Ecoli": 2, "flood_in_month": false, "flood": 1 }
            ] }] } }),
        );
        assert_eq!(run_normalize_floods(&path).await.unwrap(), 2);
        let doc = reread(&path);
        assert_eq!(doc["Ecolifloods"]["2020"][0]["01"][0]["flood_in_month"], json!(1));
        assert_eq!(doc["Ecolifloods"]["2020"][0]["01"][1]["flood_in_month"], json!(0));
        assert_eq!(run_normalize_floods(&path).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn strip_synthetic_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_file(
            &dir,
            &json!({ "Heavy_Metals": { "5": { "2020": [{ "01": [
                { "Pb_µg_L": 0.01, "synthetic": true, "synthetic_source": "model" }
            ] }] } } }),
        );
        assert_eq!(run_strip_synthetic(&path).await.unwrap(), 2);
        let doc = reread(&path);
        assert_eq!(
            doc["Heavy_Metals"]["5"]["2020"][0]["01"][0],
            json!({ "Pb_µg_L": 0.01 })
        );
    }

    #[tokio::test]
    async fn count_flood_samples_reports_numeric_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_file(
            &dir,
            &json!({ "Ecolifloods": { "2020": [{ "01": [
                { "Ecoli": 1, "flood_in_month": 1 },
                { "Ecoli": 2, "flood_in_month": true }
            ] }] } }),
        );
        assert_eq!(run_count_flood_samples(&path).await.unwrap(), 1);
    }
}
