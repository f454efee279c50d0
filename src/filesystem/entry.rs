use std::borrow::Cow;

use serde::Deserialize;

/// Marker prefix a layer filesystem puts in front of a deleted file's name.
pub const WHITEOUT_PREFIX: &str = ".wh.";

/// Separator used to split entry paths into tree segments.
pub const PATH_SEPARATOR: char = '/';

/// A single file recorded in a layer manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
    #[serde(default)]
    pub is_whiteout: bool,
}

impl FileEntry {
    #[cfg(test)]
    pub fn new(path: impl Into<String>, size: u64, is_whiteout: bool) -> Self {
        Self {
            path: path.into(),
            size,
            is_whiteout,
        }
    }
}

/// Name shown to the user: whiteouts lose their marker prefix.
pub fn display_name(name: &str, is_whiteout: bool) -> Cow<'_, str> {
    if !is_whiteout {
        return Cow::Borrowed(name);
    }
    Cow::Borrowed(name.strip_prefix(WHITEOUT_PREFIX).unwrap_or(name))
}

/// Full label including the deletion annotation.
pub fn display_label(name: &str, is_whiteout: bool) -> Cow<'_, str> {
    let base = display_name(name, is_whiteout);
    if is_whiteout {
        Cow::Owned(format!("{base} (deleted)"))
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".wh.secret.txt", true, "secret.txt (deleted)")]
    #[case("secret.txt", true, "secret.txt (deleted)")]
    #[case(".wh.secret.txt", false, ".wh.secret.txt")]
    #[case("etc/.wh.passwd", true, "etc/.wh.passwd (deleted)")]
    #[case("", false, "")]
    fn label_strips_marker_only_for_whiteouts(
        #[case] name: &str,
        #[case] is_whiteout: bool,
        #[case] expected: &str,
    ) {
        assert_eq!(display_label(name, is_whiteout), expected);
    }

    #[test]
    fn entry_deserializes_without_whiteout_flag() {
        let entry: FileEntry = serde_json::from_str(r#"{"path":"a/b","size":3}"#).unwrap();
        assert_eq!(entry, FileEntry::new("a/b", 3, false));
    }
}
