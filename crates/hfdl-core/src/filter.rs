//! Manifest narrowing: extension filter and count cap.
//!
//! Pure transform between the manifest stage and the coordinator. Relative
//! order is always preserved and an empty input is never an error.

use crate::job::FileDescriptor;

/// Normalizes an extension for matching: trimmed, lowercased, and given a
/// leading dot when missing (so "png" and ".PNG" both match "a.png").
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Filters `manifest` down to descriptors whose relative path ends
/// (case-insensitively) in one of `extensions`, then truncates to the first
/// `limit` entries. `None` means no constraint on that axis.
pub fn filter_files(
    manifest: Vec<FileDescriptor>,
    extensions: Option<&[String]>,
    limit: Option<usize>,
) -> Vec<FileDescriptor> {
    let mut files = match extensions {
        Some(exts) if !exts.is_empty() => {
            let normalized: Vec<String> = exts.iter().map(|e| normalize_extension(e)).collect();
            manifest
                .into_iter()
                .filter(|f| {
                    let lower = f.relative_path.to_ascii_lowercase();
                    normalized.iter().any(|e| lower.ends_with(e.as_str()))
                })
                .collect()
        }
        _ => manifest,
    };
    if let Some(limit) = limit {
        files.truncate(limit);
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(path: &str) -> FileDescriptor {
        FileDescriptor {
            relative_path: path.to_string(),
            source_url: format!("https://example.com/resolve/main/{}", path),
        }
    }

    fn manifest() -> Vec<FileDescriptor> {
        vec![
            descriptor("a.png"),
            descriptor("b.json"),
            descriptor("c.png"),
        ]
    }

    #[test]
    fn extension_filter_keeps_matches_in_order() {
        let exts = vec![".png".to_string()];
        let files = filter_files(manifest(), Some(&exts), None);
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.png", "c.png"]);
    }

    #[test]
    fn limit_truncates_after_filtering() {
        let files = filter_files(manifest(), None, Some(1));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "a.png");
    }

    #[test]
    fn limit_larger_than_input_is_not_an_error() {
        let files = filter_files(manifest(), None, Some(100));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn limit_zero_yields_empty() {
        let files = filter_files(manifest(), None, Some(0));
        assert!(files.is_empty());
    }

    #[test]
    fn no_constraints_passes_everything_through() {
        let files = filter_files(manifest(), None, None);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn extensions_are_normalized_and_case_insensitive() {
        let input = vec![descriptor("photo.PNG"), descriptor("doc.txt")];
        // Bare "png" gets its dot; match ignores case on both sides.
        let exts = vec!["png".to_string()];
        let files = filter_files(input, Some(&exts), None);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "photo.PNG");
    }

    #[test]
    fn multiple_extensions_union() {
        let exts = vec![".png".to_string(), ".json".to_string()];
        let files = filter_files(manifest(), Some(&exts), None);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn empty_extension_list_means_no_filter() {
        let exts: Vec<String> = Vec::new();
        let files = filter_files(manifest(), Some(&exts), None);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn empty_manifest_yields_empty() {
        let exts = vec![".png".to_string()];
        assert!(filter_files(Vec::new(), Some(&exts), Some(10)).is_empty());
    }
}
