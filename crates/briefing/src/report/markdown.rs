//! Markdown escaping and the briefing report template

/// Characters with markdown significance that must be escaped when
/// interpolating free text into a generated document
const SIGNIFICANT: &[char] = &[
    '\\', '*', '_', '`', '[', ']', '(', ')', '#', '+', '-', '.', '!', '>', '|', '{', '}',
];

/// Backslash-escape markdown-significant characters in free text so
/// interpolated analysis output cannot corrupt the document structure
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if SIGNIFICANT.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Assemble the briefing report markdown
///
/// `image_basename` is the chart file's basename, embedded as a
/// relative link so the pair stays portable as long as both files sit
/// in the same directory. The analysis and recommendation texts are
/// escaped; the symbol and basename are caller-controlled identifiers
/// and embedded verbatim.
pub fn build_report(
    symbol: &str,
    image_basename: &str,
    analysis: &str,
    recommendation: &str,
) -> String {
    format!(
        "# {symbol} Daily Briefing Report\n\
         \n\
         ![Candlestick Chart]({image_basename})\n\
         \n\
         ## Analysis\n\
         \n\
         {analysis}\n\
         \n\
         ## Recommendation\n\
         \n\
         {recommendation}\n",
        analysis = escape_markdown(analysis),
        recommendation = escape_markdown(recommendation),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_significant_characters() {
        assert_eq!(escape_markdown("a*b_c`d"), "a\\*b\\_c\\`d");
        assert_eq!(escape_markdown("[link](url)"), "\\[link\\]\\(url\\)");
        assert_eq!(escape_markdown("#1 + #2 - 3."), "\\#1 \\+ \\#2 \\- 3\\.");
        assert_eq!(escape_markdown("{a|b} > c!"), "\\{a\\|b\\} \\> c\\!");
        assert_eq!(escape_markdown("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape_markdown("plain words only"), "plain words only");
    }

    #[test]
    fn test_build_report_layout() {
        let report = build_report(
            "AAPL",
            "AAPL_daily_report_20240301_120000.png",
            "Strong quarter",
            "Hold",
        );

        assert!(report.starts_with("# AAPL Daily Briefing Report\n"));
        assert!(report.contains("![Candlestick Chart](AAPL_daily_report_20240301_120000.png)"));
        assert!(report.contains("## Analysis\n\nStrong quarter\n"));
        assert!(report.contains("## Recommendation\n\nHold\n"));
    }

    #[test]
    fn test_build_report_escapes_free_text() {
        let report = build_report("AAPL", "chart.png", "risky [data](x)", "buy *now*");

        assert!(report.contains("risky \\[data\\]\\(x\\)"));
        assert!(report.contains("buy \\*now\\*"));
        // The image link itself stays intact
        assert!(report.contains("![Candlestick Chart](chart.png)"));
    }
}
