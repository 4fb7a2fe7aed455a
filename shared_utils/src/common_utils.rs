//! Common path helpers shared across the converter.

use std::path::Path;

/// Extract a file's extension, lowercased. Empty string when there is none.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::get_extension_lowercase;
///
/// assert_eq!(get_extension_lowercase(Path::new("photo.HEIC")), "heic");
/// assert_eq!(get_extension_lowercase(Path::new("noext")), "");
/// ```
pub fn get_extension_lowercase(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Case-insensitive extension membership test.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::has_extension;
///
/// assert!(has_extension(Path::new("IMG_0001.HEIC"), &["heic"]));
/// assert!(!has_extension(Path::new("IMG_0001.jpg"), &["heic"]));
/// ```
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = get_extension_lowercase(path);
    extensions.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension_lowercase() {
        assert_eq!(get_extension_lowercase(Path::new("a.heic")), "heic");
        assert_eq!(get_extension_lowercase(Path::new("a.HEIC")), "heic");
        assert_eq!(get_extension_lowercase(Path::new("a.HeIc")), "heic");
        assert_eq!(get_extension_lowercase(Path::new("dir/a.PNG")), "png");
        assert_eq!(get_extension_lowercase(Path::new("noext")), "");
        assert_eq!(get_extension_lowercase(Path::new(".hidden")), "");
    }

    #[test]
    fn test_has_extension() {
        let exts = &["heic"];
        assert!(has_extension(Path::new("x.heic"), exts));
        assert!(has_extension(Path::new("x.HEIC"), exts));
        assert!(!has_extension(Path::new("x.heif"), exts));
        assert!(!has_extension(Path::new("x.jpg"), exts));
        assert!(!has_extension(Path::new("heic"), exts));
    }

    #[test]
    fn test_has_extension_multiple() {
        let exts = &["png", "jpg", "webp"];
        assert!(has_extension(Path::new("out.WEBP"), exts));
        assert!(has_extension(Path::new("out.Jpg"), exts));
        assert!(!has_extension(Path::new("out.gif"), exts));
    }
}
