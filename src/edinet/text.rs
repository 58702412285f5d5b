//! Normalization of Japanese text as it appears in filings: decorative
//! spacing, full-width ASCII, era-free date literals.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PAREN_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[(（].*?[)）]").unwrap());
static SINGLE_DIGIT_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d)-").unwrap());
static SINGLE_DIGIT_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d)$").unwrap());

/// Deletes line breaks, collapses every whitespace run (the ideographic
/// space U+3000 included) to a single ASCII space and trims. Total on any
/// input; empty in, empty out.
pub fn normalize_whitespace(text: &str) -> String {
    // CR and LF are deleted outright, not collapsed: a value split across
    // lines rejoins without a gap.
    let unbroken: String = text
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    WHITESPACE_RUN.replace_all(&unbroken, " ").trim().to_string()
}

/// Canonicalizes a personal name: folds full-width digits and Latin letters
/// to ASCII, drops parenthesized readings and annotations, then resolves
/// spacing by script. Japanese-script names lose all interior whitespace
/// (the spacing is decorative); pure Latin names keep single spaces between
/// words. `None` when nothing is left.
pub fn normalize_name(text: &str) -> Option<String> {
    let folded: String = text.chars().map(to_halfwidth).collect();
    // Parenthesized segments hold furigana, romanizations or former names,
    // never part of the name itself. Non-greedy, so paired segments each
    // drop on their own.
    let stripped = PAREN_SEGMENT.replace_all(&folded, "");
    let respaced: String = if has_japanese_script(&stripped) {
        stripped.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        WHITESPACE_RUN.replace_all(&stripped, " ").into_owned()
    };
    let name = respaced.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Canonicalizes the birth-date literals seen in filings ("１９６０年１月
/// ５日生", parenthesized variants, missing 生 suffix) to `YYYY-MM-DD`.
/// The result must survive a strict calendar parse: era-based years such as
/// 令和五年 and free text come back as `None`. Already-normalized input
/// passes through unchanged.
pub fn normalize_date(text: &str) -> Option<String> {
    // Step 1: fold full-width digits and the ideographic space to ASCII.
    let folded: String = text
        .chars()
        .map(to_halfwidth)
        .map(|c| if c == '\u{3000}' { ' ' } else { c })
        .collect();
    // Step 2: the year and month markers become separators.
    let dashed = folded.replace(['年', '月'], "-");
    // Step 3: the day marker, the 生 suffix and any parenthesis wrapping
    // carry no date information.
    let bare: String = dashed
        .chars()
        .filter(|c| !matches!(c, '日' | '生' | '(' | ')' | '（' | '）'))
        .collect();
    let trimmed = bare.trim();
    // Step 4: widen single-digit month and day so the strict parse below
    // sees one canonical shape.
    let padded = SINGLE_DIGIT_MONTH.replace_all(trimmed, "-0${1}-");
    let padded = SINGLE_DIGIT_DAY.replace_all(&padded, "-0${1}");
    // Step 5: calendar-checked parse; anything invalid is rejected here.
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

// Full-width digits and Latin letters map straight down into ASCII.
fn to_halfwidth(c: char) -> char {
    match c {
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

// Hiragana, katakana or CJK ideographs anywhere in the string.
fn has_japanese_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309f}' | '\u{30a0}'..='\u{30ff}' | '\u{4e00}'..='\u{9fff}')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("取締役\u{3000}会長"), "取締役 会長");
        assert_eq!(normalize_whitespace("  a \t b  "), "a b");
    }

    #[test]
    fn test_normalize_whitespace_deletes_line_breaks() {
        assert_eq!(normalize_whitespace("代表取締役\n社長"), "代表取締役社長");
        assert_eq!(normalize_whitespace("a\r\nb c"), "ab c");
    }

    #[test]
    fn test_normalize_whitespace_is_total() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \u{3000} \n"), "");
    }

    #[test]
    fn test_normalize_name_removes_decorative_spacing() {
        let cases = [
            ("吉 野 正 己", "吉野正己"),
            ("三輪 正俊", "三輪正俊"),
            ("ヴー ヴァン チュン", "ヴーヴァンチュン"),
            ("三 井 田  健   みいだ たけし", "三井田健みいだたけし"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_name(input).as_deref(), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_normalize_name_keeps_latin_word_spacing() {
        assert_eq!(
            normalize_name("Amy Shigemi Hatta").as_deref(),
            Some("Amy Shigemi Hatta")
        );
        assert_eq!(
            normalize_name("Ｊｏｈｎ　Ｓｍｉｔｈ").as_deref(),
            Some("John Smith")
        );
    }

    #[test]
    fn test_normalize_name_drops_parenthesized_segments() {
        let cases = [
            ("Didier Leroy (ディディエ ルロワ)", "Didier Leroy"),
            ("三谷 和歌子（戸籍上の氏名は赤松和歌子）", "三谷和歌子"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_name(input).as_deref(), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_normalize_name_rejects_blank_results() {
        for input in ["", " ", "\u{3000}", "（旧姓）"] {
            assert_eq!(normalize_name(input), None, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_date_accepts_filing_variants() {
        let cases = [
            ("２０００年１月１日生", "2000-01-01"),
            ("1990年12月5日", "1990-12-05"),
            ("1987年7月20日", "1987-07-20"),
            ("(1947年１月17日生)", "1947-01-17"),
            ("（1964年２月16日生）", "1964-02-16"),
            ("（1964年２月16日）", "1964-02-16"),
            ("1933年８月28日生", "1933-08-28"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_date(input).as_deref(), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_normalize_date_rejects_unparseable_literals() {
        for input in ["令和五年八月", "abc", "", "記載なし", "2000年13月1日"] {
            assert_eq!(normalize_date(input), None, "input: {input:?}");
        }
    }

    #[test]
    fn test_normalize_date_is_idempotent() {
        let once = normalize_date("２０００年１月１日生").unwrap();
        assert_eq!(normalize_date(&once), Some(once.clone()));
    }
}
