//! JSON output for `--once` runs.
//!
//! The document is the same array the HTTP endpoint serves, pretty-printed.

use crate::models::ContentItem;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `items` as a pretty JSON array.
pub fn render(items: &[ContentItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}

/// Write the listing to `path`, or to stdout when `path` is `None`.
///
/// The parent directory is created if needed and probed for writability
/// before anything is written.
///
/// # Arguments
///
/// * `items` - The aggregated listing to serialize
/// * `path` - Destination file, or `None` for stdout
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation or
/// file writing fails.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub async fn write_items(items: &[ContentItem], path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = render(items)?;

    let Some(path) = path else {
        println!("{json}");
        return Ok(());
    };

    let parent = Path::new(path)
        .parent()
        .and_then(Path::to_str)
        .filter(|p| !p.is_empty())
        .unwrap_or(".");
    ensure_writable_dir(parent).await?;

    fs::write(path, json).await?;
    info!(path, count = items.len(), "Wrote JSON listing");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn item() -> ContentItem {
        ContentItem {
            source: Source::FederalCourt,
            title: "Smith v Jones".to_string(),
            link: "http://www.fedcourt.gov.au/judgments/1".to_string(),
            published: None,
            date: Some("02 Oct 2023".to_string()),
            summary: None,
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_render_items() {
        let json = render(&[item()]).unwrap();
        let back: Vec<ContentItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![item()]);
        assert!(json.contains("\"Federal Court\""));
    }

    #[tokio::test]
    async fn test_write_items_to_file() {
        let dir = std::env::temp_dir().join(format!("legalcurrent_json_{}", std::process::id()));
        let path = dir.join("nested").join("latest.json");
        let path_str = path.to_str().unwrap();

        write_items(&[item()], Some(path_str)).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("Smith v Jones"));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
