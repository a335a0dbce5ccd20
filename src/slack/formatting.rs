//! Text escaping for Slack message bodies and attachment fields.

/// Escape the three characters Slack treats as control sequences.
///
/// Keeps `<@U123>` mentions, `<!channel>` pings and `<url|text>` links in
/// relayed content from being interpreted by the client.
///
/// # Examples
///
/// ```
/// use sns_hook::slack::escape_text;
///
/// assert_eq!(escape_text("<!channel> a & b"), "&lt;!channel&gt; a &amp; b");
/// ```
#[must_use]
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
