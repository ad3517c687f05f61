use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_ ]+").expect("title pattern is a valid regex")
});

/// Replace each run of characters outside `[A-Za-z0-9_ ]` with one space, then trim.
pub fn sanitize_title(title: &str) -> String {
    DISALLOWED_RUN.replace_all(title, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_runs_with_single_space() {
        assert_eq!(
            sanitize_title("USB-C™ Charger!!! (2 pack)"),
            "USB C  Charger   2 pack"
        );
        assert_eq!(sanitize_title("Écouteurs sans fil"), "couteurs sans fil");
    }

    #[test]
    fn keeps_allowed_characters() {
        assert_eq!(sanitize_title("plain_title 42"), "plain_title 42");
    }

    #[test]
    fn trims_edges_and_handles_empty() {
        assert_eq!(sanitize_title("  ★★ Best ★★  "), "Best");
        assert_eq!(sanitize_title("★★★"), "");
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn tabs_and_newlines_become_spaces() {
        assert_eq!(sanitize_title("a\tb\nc"), "a b c");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "USB-C™ Charger!!! (2 pack)",
            "  ★★ Best ★★  ",
            "mixed — dashes – and ‘quotes’",
            "数据线 cable 1m",
            "already clean",
        ];
        for sample in samples {
            let once = sanitize_title(sample);
            assert_eq!(sanitize_title(&once), once, "sample {sample:?}");
        }
    }
}
