// Folder-path normalization and the backwards (suffix-anchored) comparison
// between the folders a virtual-drive path claims and the folders Drive
// reports for a candidate.
//
// Example:
//   expected: "Projects/Aideia"           (from u:\My Drive\Projects\Aideia\file.gdoc
//                                          after the root label was matched away)
//   actual:   "My Drive/Projects/Aideia"  (walked from Drive's parent chain)
//   "Aideia" == "Aideia", "Projects" == "Projects", expected exhausted -> match.

/// Splits a slash-delimited path into trimmed, non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Trims every segment, drops empty ones and rejoins with `/`.
pub fn normalize(path: &str) -> String {
    segments(path).join("/")
}

/// Returns true when `actual` ends with exactly the segments of `expected`.
///
/// Extra leading segments in `actual` (the root label, a shared-drive name)
/// are ignored. An empty `expected` accepts any placement; a non-empty
/// `expected` never matches an empty `actual`. Comparison is exact and
/// case-sensitive.
pub fn match_backwards(expected: &str, actual: &str) -> bool {
    let expected_parts = segments(expected);
    let actual_parts = segments(actual);

    if expected_parts.is_empty() {
        return true;
    }

    if actual_parts.is_empty() {
        return false;
    }

    tracing::debug!(
        "Matching backwards - Expected: {:?}, Actual: {:?}",
        expected_parts,
        actual_parts
    );

    let mut actual_iter = actual_parts.iter().rev();
    for expected_part in expected_parts.iter().rev() {
        let Some(actual_part) = actual_iter.next() else {
            tracing::debug!("  Ran out of actual segments before '{}'", expected_part);
            return false;
        };

        if expected_part != actual_part {
            tracing::debug!("  Mismatch: '{}' != '{}'", expected_part, actual_part);
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_drops_empty_segments() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("/"), "");
        assert_eq!(normalize(" My Drive / Projects//Aideia/ "), "My Drive/Projects/Aideia");
    }

    #[test]
    fn normalize_is_idempotent_and_keeps_order() {
        for path in ["", "a", "/a//b/", " x / y / z ", "My Drive/Projects"] {
            let once = normalize(path);
            assert_eq!(normalize(&once), once);
        }
        assert_eq!(normalize("c/b/a"), "c/b/a");
    }

    #[test]
    fn suffix_with_extra_leading_segments_matches() {
        assert!(match_backwards("Projects/Aideia", "My Drive/Projects/Aideia"));
        assert!(match_backwards("Projects/Aideia", "Projects/Aideia"));
        assert!(match_backwards("Aideia", "Shared drives/Team/Projects/Aideia"));
    }

    #[test]
    fn root_label_in_expected_must_exist_in_actual() {
        assert!(match_backwards("My Drive/Projects", "My Drive/Projects"));
        assert!(!match_backwards("My Drive/Projects", "Projects"));
    }

    #[test]
    fn empty_expected_always_matches() {
        assert!(match_backwards("", ""));
        assert!(match_backwards("", "My Drive/Archive"));
        assert!(match_backwards(" / ", "anything"));
    }

    #[test]
    fn non_empty_expected_never_matches_empty_actual() {
        assert!(!match_backwards("Projects", ""));
        assert!(!match_backwards("Projects", "/"));
    }

    #[test]
    fn mismatch_anywhere_in_the_anchored_suffix_fails() {
        assert!(!match_backwards("Projects/Aideia", "My Drive/Archive"));
        assert!(!match_backwards("Projects/Aideia", "My Drive/Other/Aideia"));
        assert!(!match_backwards("Projects/Aideia", "My Drive/Projects/Aideia/code"));
    }

    #[test]
    fn matching_is_contiguous_not_a_subsequence() {
        assert!(!match_backwards("Projects/Aideia", "Projects/x/Aideia"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!match_backwards("projects", "My Drive/Projects"));
    }

    #[test]
    fn shorter_actual_fails() {
        assert!(!match_backwards("My Drive/Projects/Aideia", "Projects/Aideia"));
    }
}
