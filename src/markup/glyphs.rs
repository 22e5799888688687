//! Checkbox and status marker substitutions.

/// Open checkbox glyph.
pub const OPEN_BOX: &str = "\u{2610}";

/// Check mark glyph.
pub const CHECK_MARK: &str = "\u{2713}";

/// Pending marker glyph.
pub const PENDING: &str = "\u{25CB}";

/// Literal substitutions, applied in this order to the whole hypertext.
pub const SUBSTITUTIONS: [(&str, &str); 6] = [
    ("[ ]", OPEN_BOX),
    ("[x]", CHECK_MARK),
    ("[X]", CHECK_MARK),
    ("\u{2B1C}", OPEN_BOX),
    ("\u{2705}", CHECK_MARK),
    ("\u{1F7E1}", PENDING),
];

/// Replace every occurrence of each marker with its glyph.
///
/// Runs over the rendered hypertext, so markers inside code blocks are
/// replaced as well.
pub fn substitute_glyphs(html: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(html.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkboxes() {
        let out = substitute_glyphs("<li>[ ] task</li><li>[x] done</li><li>[X] also</li>");
        assert_eq!(out, "<li>☐ task</li><li>✓ done</li><li>✓ also</li>");
    }

    #[test]
    fn test_emoji_markers() {
        assert_eq!(substitute_glyphs("⬜ ✅ 🟡"), "☐ ✓ ○");
    }

    #[test]
    fn test_other_brackets_untouched() {
        let input = "[a] [xx] [ x] [] [TOC] [-]";
        assert_eq!(substitute_glyphs(input), input);
    }

    #[test]
    fn test_code_is_not_guarded() {
        let out = substitute_glyphs("<pre><code>let v = [x];</code></pre>");
        assert_eq!(out, "<pre><code>let v = ✓;</code></pre>");
    }
}
