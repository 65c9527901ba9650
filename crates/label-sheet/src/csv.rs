//! Bulk template loading from CSV
//!
//! Columns: title, subtitle, price, quantity, extra. Only the title
//! column is required; empty trailing columns fall back to the job
//! defaults at render time.

use crate::template::LabelTemplate;
use crate::types::{LabelError, Result};
use std::path::Path;

pub async fn load_templates_from_csv(path: impl AsRef<Path>) -> Result<Vec<LabelTemplate>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let templates = tokio::task::spawn_blocking(move || {
        let mut reader = csv::Reader::from_reader(contents.as_bytes());
        let mut templates = Vec::new();

        for result in reader.records() {
            let record = result?;
            if record.is_empty() {
                continue;
            }
            templates.push(LabelTemplate {
                title: field(&record, 0),
                subtitle: field(&record, 1),
                price: field(&record, 2),
                quantity: field(&record, 3),
                extra: field(&record, 4),
            });
        }
        Ok::<_, LabelError>(templates)
    })
    .await??;

    Ok(templates)
}

fn field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
