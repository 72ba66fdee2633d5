//! Download URLs for record attachments.
//!
//! The backend serves files at `<base>/api/files/<collection>/<record>/<name>`.
//! The URL is assembled here; the backend never returns it.

#[cfg(test)]
#[path = "files_test.rs"]
mod tests;

/// URL of `filename` attached to `record_id` in `collection`.
///
/// Returns `None` when the record has no file in that field.
#[must_use]
pub fn file_url(base_url: &str, collection: &str, record_id: &str, filename: &str) -> Option<String> {
    if filename.is_empty() || record_id.is_empty() {
        return None;
    }
    let base = base_url.trim_end_matches('/');
    Some(format!("{base}/api/files/{collection}/{record_id}/{filename}"))
}

/// Like [`file_url`] but asks the backend for a `WxH` thumbnail.
#[must_use]
pub fn thumb_url(base_url: &str, collection: &str, record_id: &str, filename: &str, width: u32, height: u32) -> Option<String> {
    file_url(base_url, collection, record_id, filename).map(|url| format!("{url}?thumb={width}x{height}"))
}
