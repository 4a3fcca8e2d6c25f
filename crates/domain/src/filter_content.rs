/// Lines starting with this marker are comments, never rules.
pub const COMMENT_MARKER: char = '!';

const TITLE_PREFIX: &str = "! Title:";

/// Rule count and optional title extracted from raw filter content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFilter {
    pub rules_count: usize,
    pub title: Option<String>,
}

/// Count the rules in a filter and pick up its `! Title:` header.
///
/// Every trimmed, non-empty line that does not start with `!` is a rule.
/// Only the first title comment is used. Invalid UTF-8 is decoded lossily,
/// so any byte sequence parses.
pub fn parse_filter_contents(contents: &[u8]) -> ParsedFilter {
    let text = String::from_utf8_lossy(contents);
    let mut parsed = ParsedFilter::default();

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(COMMENT_MARKER) {
            if parsed.title.is_none() {
                parsed.title = parse_title(line);
            }
        } else {
            parsed.rules_count += 1;
        }
    }

    parsed
}

/// The rule lines of a filter, trimmed, in file order.
pub fn rule_lines(contents: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(contents)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(str::to_string)
        .collect()
}

/// `! Title: <text>` with at least one space after the colon.
fn parse_title(line: &str) -> Option<String> {
    let rest = line.strip_prefix(TITLE_PREFIX)?;
    if !rest.starts_with(' ') {
        return None;
    }
    Some(rest.trim_start_matches(' ').to_string())
}

/// CRC-32 (IEEE) fingerprint used to detect unchanged remote content.
pub fn checksum(contents: &[u8]) -> u32 {
    crc32fast::hash(contents)
}
