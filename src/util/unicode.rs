use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to fit within `max_cells` terminal cells, ending in `…` when
/// anything was cut. Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = display_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Truncate or right-pad with spaces to exactly `cells` cells (a cut wide
/// character may leave it one short, which the padding then fills).
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

/// Remove the last grapheme cluster (backspace in a text field).
pub fn pop_grapheme(s: &mut String) -> bool {
    match s.grapheme_indices(true).next_back() {
        Some((i, _)) => {
            s.truncate(i);
            true
        }
        None => false,
    }
}

/// Keep the end of `s` that fits in `max_cells`, for a text field whose
/// cursor sits at the end.
pub fn tail_to_width(s: &str, max_cells: usize) -> &str {
    let mut width = 0;
    let mut start = s.len();
    for (i, g) in s.grapheme_indices(true).rev() {
        let gw = display_width(g);
        if width + gw > max_cells {
            break;
        }
        width += gw;
        start = i;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_of_wide_and_combining_text() {
        assert_eq!(display_width("docs"), 4);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Docs", 10), "Docs");
        assert_eq!(truncate_to_width("Documentation", 5), "Docu\u{2026}");
        assert_eq!(truncate_to_width("Docs", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Docs", 0), "");
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        assert_eq!(truncate_to_width("你好世界", 4), "你\u{2026}");
    }

    #[test]
    fn fit_pads_and_cuts() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdef", 4), "abc\u{2026}");
        assert_eq!(display_width(&fit_to_width("你好世界", 4)), 4);
    }

    #[test]
    fn pop_removes_whole_clusters() {
        let mut s = String::from("cafe\u{0301}");
        assert!(pop_grapheme(&mut s));
        assert_eq!(s, "caf");
        let mut empty = String::new();
        assert!(!pop_grapheme(&mut empty));
    }

    #[test]
    fn tail_keeps_the_end() {
        assert_eq!(tail_to_width("https://example.com", 7), "ple.com");
        assert_eq!(tail_to_width("short", 10), "short");
        assert_eq!(tail_to_width("你好", 3), "好");
    }
}
