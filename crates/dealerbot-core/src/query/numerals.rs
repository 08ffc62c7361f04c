//! Keyword normalization for numeric fields.
//!
//! Customers write prices the way they say them: `52.8萬`, `五十萬`,
//! `30萬元`, `2020年式`, `3萬5千公里`. Stored values are plain digits, so a
//! keyword aimed at a numeric field is rewritten to digits before it is matched.

const NOISE: [char; 4] = ['元', '台', '幣', ','];

// Longest first: `年式` must win over `年`.
const UNIT_SUFFIXES: [&str; 4] = ["年式", "年", "公里", "km"];

/// Rewrite `keyword` to plain digits when it reads as a number, otherwise `None`.
pub fn normalize_numeric_keyword(keyword: &str) -> Option<String> {
    let cleaned: String = keyword
        .chars()
        .filter(|c| !c.is_whitespace() && !NOISE.contains(c))
        .collect::<String>()
        .to_lowercase();
    let cleaned = strip_unit(&cleaned).to_string();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(head) = cleaned.strip_suffix('萬') {
        if let Some(n) = parse_decimal(head) {
            return Some(format_whole(n * 10_000.0));
        }
        return parse_chinese(head).map(|n| n.saturating_mul(10_000).to_string());
    }

    if parse_decimal(&cleaned).is_some() {
        return Some(cleaned);
    }
    parse_chinese(&cleaned).map(|n| n.to_string())
}

fn strip_unit(s: &str) -> &str {
    UNIT_SUFFIXES
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s)
}

fn parse_decimal(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_whole(n: f64) -> String {
    format!("{}", n.round() as u64)
}

fn digit(c: char) -> Option<u64> {
    match c {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '兩' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => c.to_digit(10).map(u64::from),
    }
}

fn unit(c: char) -> Option<u64> {
    match c {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1_000),
        _ => None,
    }
}

/// `三十五` → 35, `兩千五百` → 2500, `十二萬三千` → 123000.
fn parse_chinese(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }

    let mut total = 0u64;
    let mut section = 0u64;
    let mut current: Option<u64> = None;

    for c in s.chars() {
        if let Some(d) = digit(c) {
            current = Some(current.map_or(d, |n| n.saturating_mul(10).saturating_add(d)));
        } else if let Some(u) = unit(c) {
            section = section.saturating_add(current.unwrap_or(1).saturating_mul(u));
            current = None;
        } else if c == '萬' {
            total = total.saturating_add(section.saturating_add(current.unwrap_or(0)).saturating_mul(10_000));
            section = 0;
            current = None;
        } else {
            return None;
        }
    }

    Some(total.saturating_add(section).saturating_add(current.unwrap_or(0)))
}
