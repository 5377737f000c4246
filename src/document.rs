use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    front_matter,
    identity,
    walker::DiscoveredFile,
};

/// Category assigned to files sitting directly at the corpus root.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Number of body characters used for a derived description.
const DESCRIPTION_CHARS: usize = 150;

/// The canonical record produced for one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable id: absolute value of the 32-bit polynomial hash of
    /// `source_path`. Unique within a corpus snapshot.
    pub id: u32,
    pub title: String,
    /// Document text with the metadata header stripped.
    pub body: String,
    pub description: String,
    /// First path segment under the corpus root; never empty.
    pub category: String,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    /// URL-safe token derived from the filename only.
    pub slug: String,
    /// Path relative to the process root, `/`-separated. Hash input for
    /// `id`; retained for diagnostics.
    pub source_path: String,
}

/// Build one [`Document`] from a discovered file.
///
/// Read or decode failures return `Err` so the batch layer can drop the file
/// and keep going; nothing in here aborts a whole build.
pub fn build_document(file: &DiscoveredFile) -> Result<Document> {
    let bytes = std::fs::read(&file.path)?;
    let text = String::from_utf8(bytes).map_err(|_| Error::Decode {
        path: file.path.display().to_string(),
    })?;

    let (meta, body) = front_matter::split(&text);
    let body = body.trim().to_string();

    let stem = file
        .relative_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    // The header may carry a `slug` field; the filename-derived slug wins.
    let slug = identity::slugify(stem);

    let title = meta
        .scalar("title")
        .filter(|t| !t.is_empty())
        .unwrap_or(stem)
        .to_string();

    let category = derive_category(file);

    let tags = match meta.list("tags") {
        Some(tags) => tags,
        None => vec![category.clone()],
    };

    let description = meta
        .scalar("description")
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| derive_description(&body));

    let published_at = parse_published(meta.scalar("date"));

    let source_path = file.path.to_string_lossy().replace('\\', "/");
    let id = identity::path_id(&source_path);

    Ok(Document {
        id,
        title,
        body,
        description,
        category,
        tags,
        published_at,
        slug,
        source_path,
    })
}

/// First path segment under the root, or the default for root-level files.
fn derive_category(file: &DiscoveredFile) -> String {
    let mut components = file.relative_path.components();
    match (components.next(), components.next()) {
        (Some(first), Some(_)) => {
            first.as_os_str().to_string_lossy().to_string()
        }
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// First ~150 characters of the body with newlines collapsed.
fn derive_description(body: &str) -> String {
    let collapsed: String = body
        .chars()
        .take(DESCRIPTION_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("{}…", collapsed.trim_end())
}

fn parse_published(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return DateTime::UNIX_EPOCH;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    // Bare dates are common in hand-written headers.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    }
    DateTime::UNIX_EPOCH
}
