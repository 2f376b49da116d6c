//! FormatParser Module
//!
//! Excel Number Format Stringの構文解析と、数値への適用（表示文字列の生成）を提供します。

use super::sections::{FormatSection, SectionKind};
use super::tokens::FormatToken;

/// General書式で指数表記に切り替える上限（絶対値）
const GENERAL_SCIENTIFIC_UPPER: f64 = 1e11;

/// General書式で指数表記に切り替える下限（絶対値）
const GENERAL_SCIENTIFIC_LOWER: f64 = 1e-9;

/// Number Format Stringパーサー
///
/// Excel Number Format Stringを解析し、数値をフォーマットします。
/// 解析は失敗しません。解釈できない文字はリテラルとして扱われます。
#[derive(Debug, Clone)]
pub(crate) struct FormatParser {
    /// パースされたセクション（1つ以上）
    sections: Vec<FormatSection>,
}

impl FormatParser {
    /// フォーマット文字列をパース
    ///
    /// # 引数
    ///
    /// * `format_string` - Excel Number Format String
    pub fn parse(format_string: &str) -> Self {
        // 1. セクション分割
        let section_strs = Self::split_sections(format_string);

        // 2. 各セクションのパース
        let mut sections = Vec::new();
        for (idx, section_str) in section_strs.iter().enumerate() {
            let Some(kind) = SectionKind::from_position(idx) else {
                break;
            };
            sections.push(Self::parse_section(section_str.trim(), kind));
        }

        // セクションが空の場合はGeneralセクションを追加
        if sections.is_empty() {
            let mut section = FormatSection::new(SectionKind::Positive);
            section.tokens.push(FormatToken::General);
            sections.push(section);
        }

        Self { sections }
    }

    /// パースされたセクション
    pub fn sections(&self) -> &[FormatSection] {
        &self.sections
    }

    /// セクションに分割
    ///
    /// Excel Number Format Stringは';'でセクションに分割されます。
    /// ただし、'['と']'で囲まれた部分、引用符内、エスケープされた文字は除外します。
    fn split_sections(format_string: &str) -> Vec<String> {
        let mut sections = Vec::new();
        let mut current = String::new();
        let mut in_brackets = false;
        let mut in_quotes = false;
        let mut escaped = false;

        for ch in format_string.chars() {
            if escaped {
                current.push(ch);
                escaped = false;
                continue;
            }
            match ch {
                '\\' if !in_quotes => {
                    escaped = true;
                    current.push(ch);
                }
                '"' => {
                    in_quotes = !in_quotes;
                    current.push(ch);
                }
                '[' if !in_quotes => {
                    in_brackets = true;
                    current.push(ch);
                }
                ']' if !in_quotes => {
                    in_brackets = false;
                    current.push(ch);
                }
                ';' if !in_brackets && !in_quotes => {
                    sections.push(std::mem::take(&mut current));
                }
                _ => {
                    current.push(ch);
                }
            }
        }

        if !current.is_empty() {
            sections.push(current);
        }

        sections
    }

    /// セクションをパース
    ///
    /// # 引数
    ///
    /// * `section_str` - セクション文字列
    /// * `kind` - セクションの種類
    fn parse_section(section_str: &str, kind: SectionKind) -> FormatSection {
        let mut section = FormatSection::new(kind);

        if section_str.eq_ignore_ascii_case("general") {
            section.tokens.push(FormatToken::General);
            return section;
        }

        let mut chars = section_str.chars().peekable();
        let mut seen_decimal = false;

        while let Some(ch) = chars.next() {
            let token = match ch {
                '"' => {
                    let literal: String = chars.by_ref().take_while(|&c| c != '"').collect();
                    if literal.is_empty() {
                        continue;
                    }
                    FormatToken::Literal(literal)
                }
                '\\' => match chars.next() {
                    Some(escaped) => FormatToken::Literal(escaped.to_string()),
                    None => continue,
                },
                '_' => {
                    // 次の文字の幅の空白
                    chars.next();
                    FormatToken::Literal(" ".to_string())
                }
                '*' => {
                    // 繰り返し文字（列幅依存のため無視）
                    chars.next();
                    continue;
                }
                '[' => {
                    let content: String = chars.by_ref().take_while(|&c| c != ']').collect();
                    match Self::parse_bracket(&content) {
                        Some(token) => token,
                        None => continue,
                    }
                }
                '@' => FormatToken::TextPlaceholder,
                '0' => {
                    let count = Self::count_consecutive(&mut chars, '0') + 1;
                    if seen_decimal {
                        FormatToken::DecimalZero(count)
                    } else {
                        FormatToken::IntegerZero(count)
                    }
                }
                '#' | '?' => {
                    if seen_decimal {
                        FormatToken::DecimalHash
                    } else {
                        FormatToken::IntegerHash
                    }
                }
                '.' => {
                    seen_decimal = true;
                    FormatToken::DecimalPoint
                }
                ',' => FormatToken::ThousandSeparator,
                '%' => FormatToken::Percent,
                'E' | 'e' if matches!(chars.peek(), Some('+') | Some('-')) => {
                    let plus = chars.next() == Some('+');
                    let mut digits = 0;
                    while chars.peek().is_some_and(|&c| matches!(c, '0' | '#' | '?')) {
                        chars.next();
                        digits += 1;
                    }
                    FormatToken::Exponent {
                        plus,
                        digits: digits.max(1),
                    }
                }
                'y' | 'Y' => {
                    let count = Self::count_consecutive_case_insensitive(&mut chars, 'y');
                    FormatToken::Year(count + 1)
                }
                'm' | 'M' => {
                    let count = Self::count_consecutive_case_insensitive(&mut chars, 'm') + 1;
                    // 直前の日時トークンが時、または直後が秒なら分
                    let after_hour = section
                        .tokens
                        .iter()
                        .rev()
                        .find(|t| t.is_datetime())
                        .is_some_and(|t| matches!(t, FormatToken::Hour(_)));
                    let before_second = chars
                        .clone()
                        .find(|&c| c != ':')
                        .is_some_and(|c| c.eq_ignore_ascii_case(&'s'));
                    if count <= 2 && (after_hour || before_second) {
                        FormatToken::Minute(count)
                    } else {
                        FormatToken::Month(count)
                    }
                }
                'd' | 'D' => {
                    let count = Self::count_consecutive_case_insensitive(&mut chars, 'd');
                    FormatToken::Day(count + 1)
                }
                'h' | 'H' => {
                    let count = Self::count_consecutive_case_insensitive(&mut chars, 'h');
                    FormatToken::Hour(count + 1)
                }
                's' | 'S' => {
                    let count = Self::count_consecutive_case_insensitive(&mut chars, 's');
                    FormatToken::Second(count + 1)
                }
                'a' | 'A' if Self::lookahead_matches(ch, &chars, "AM/PM") => {
                    chars.nth(3);
                    FormatToken::AmPm
                }
                'a' | 'A' if Self::lookahead_matches(ch, &chars, "A/P") => {
                    chars.nth(1);
                    FormatToken::AmPm
                }
                c if c.is_ascii_alphabetic() => FormatToken::Letter(c),
                _ => {
                    // その他の文字はリテラルとして扱う
                    FormatToken::Literal(ch.to_string())
                }
            };
            section.tokens.push(token);
        }

        section
    }

    /// ブラケット内の内容を解析
    ///
    /// * `[h]`, `[mm]`, `[ss]` - 経過時間
    /// * `[$€-407]` - 通貨記号（ロケール部分は無視）
    /// * `[Red]` - 色指定
    /// * `[>100]` - 条件（無視）
    fn parse_bracket(content: &str) -> Option<FormatToken> {
        let lower = content.to_ascii_lowercase();
        if let Some(first) = lower.chars().next() {
            if matches!(first, 'h' | 'm' | 's') && lower.chars().all(|c| c == first) {
                let count = lower.len();
                return Some(match first {
                    'h' => FormatToken::Hour(count),
                    'm' => FormatToken::Minute(count),
                    _ => FormatToken::Second(count),
                });
            }
        }

        if let Some(currency) = content.strip_prefix('$') {
            let symbol = currency.split('-').next().unwrap_or_default();
            if symbol.is_empty() {
                return None;
            }
            return Some(FormatToken::Literal(symbol.to_string()));
        }

        if content.starts_with(char::is_alphabetic) {
            return Some(FormatToken::Color(content.to_string()));
        }

        None
    }

    /// 現在の文字と後続の文字が`expected`に一致するか（大文字小文字を区別しない）
    fn lookahead_matches<I>(current: char, chars: &std::iter::Peekable<I>, expected: &str) -> bool
    where
        I: Iterator<Item = char> + Clone,
    {
        let candidate: String = std::iter::once(current)
            .chain(chars.clone())
            .take(expected.chars().count())
            .collect();
        candidate.eq_ignore_ascii_case(expected)
    }

    /// 連続する同じ文字をカウント
    fn count_consecutive<I>(chars: &mut std::iter::Peekable<I>, target: char) -> usize
    where
        I: Iterator<Item = char>,
    {
        let mut count = 0;
        while chars.next_if_eq(&target).is_some() {
            count += 1;
        }
        count
    }

    /// 連続する同じ文字をカウント（大文字小文字を区別しない）
    fn count_consecutive_case_insensitive<I>(
        chars: &mut std::iter::Peekable<I>,
        target: char,
    ) -> usize
    where
        I: Iterator<Item = char>,
    {
        let mut count = 0;
        while chars
            .next_if(|c| c.eq_ignore_ascii_case(&target))
            .is_some()
        {
            count += 1;
        }
        count
    }

    /// 数値をフォーマット
    ///
    /// 日付・時刻セクションが選択された場合はGeneral書式にフォールバックします
    /// （日付としての表示は呼び出し側がchronoで行います）。
    ///
    /// # 引数
    ///
    /// * `value` - フォーマットする数値
    pub fn format_number(&self, value: f64) -> String {
        // 1. セクションの選択
        let section = self.select_section(value);

        // 2. 明示的な負数セクションでは符号をリテラル側で表現する
        let value = if section.kind == SectionKind::Negative {
            value.abs()
        } else {
            value
        };

        // 3. トークンに基づいてフォーマット
        if section.is_numeric() && !section.is_datetime() {
            Self::format_numeric(value, section)
        } else {
            Self::format_literal_section(value, section)
        }
    }

    /// 適切なセクションを選択
    ///
    /// テキストセクションは数値には使用しません。
    fn select_section(&self, value: f64) -> &FormatSection {
        let numeric: Vec<&FormatSection> = self
            .sections
            .iter()
            .filter(|s| s.kind != SectionKind::Text)
            .collect();

        let index = if value < 0.0 && numeric.len() >= 2 {
            1
        } else if value == 0.0 && numeric.len() >= 3 {
            2
        } else {
            0
        };

        numeric
            .get(index)
            .copied()
            .unwrap_or(&self.sections[0])
    }

    /// 数値トークンを含まないセクションのフォーマット
    ///
    /// "General"トークンとリテラルのみを出力します。
    fn format_literal_section(value: f64, section: &FormatSection) -> String {
        if section.is_datetime() || section.is_text_only() {
            return Self::format_general(value);
        }

        let mut result = String::new();
        for token in &section.tokens {
            match token {
                FormatToken::General => result.push_str(&Self::format_general(value)),
                FormatToken::Literal(s) => result.push_str(s),
                FormatToken::Letter(c) => result.push(*c),
                _ => {}
            }
        }
        result
    }

    /// 数値セクションのフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - フォーマットする数値（明示的な負数セクションでは絶対値）
    /// * `section` - フォーマットセクション
    fn format_numeric(value: f64, section: &FormatSection) -> String {
        let tokens = &section.tokens;
        let negative = value < 0.0;
        let mut magnitude = value.abs();

        // パーセント記号ごとに100倍
        let percent_count = tokens
            .iter()
            .filter(|t| matches!(t, FormatToken::Percent))
            .count();
        magnitude *= 100f64.powi(percent_count as i32);

        // 整数部の桁記号の間にある千の位区切りは桁区切り
        let grouping = tokens
            .iter()
            .rposition(|t| matches!(t, FormatToken::IntegerZero(_) | FormatToken::IntegerHash))
            .is_some_and(|last| {
                tokens[..last]
                    .iter()
                    .any(|t| matches!(t, FormatToken::ThousandSeparator))
            });

        // 最後の桁記号の直後にある千の位区切りは1000単位のスケーリング
        if let Some(last) = tokens.iter().rposition(FormatToken::is_digit) {
            let scaling = tokens[last + 1..]
                .iter()
                .take_while(|t| matches!(t, FormatToken::ThousandSeparator))
                .count();
            magnitude /= 1000f64.powi(scaling as i32);
        }

        let mut integer_min = 0;
        let mut decimal_zeros = 0;
        let mut decimal_hashes = 0;
        let mut exponent = None;
        for token in tokens {
            match token {
                FormatToken::IntegerZero(count) => integer_min += *count,
                FormatToken::DecimalZero(count) => decimal_zeros += *count,
                FormatToken::DecimalHash => decimal_hashes += 1,
                FormatToken::Exponent { plus, digits } => exponent = Some((*plus, *digits)),
                _ => {}
            }
        }
        let decimals = decimal_zeros + decimal_hashes;

        // 指数表記の場合は仮数と指数に分解
        let (mantissa, exponent_str) = match exponent {
            Some((plus, digits)) => {
                let (mantissa, exp) = Self::split_exponent(magnitude, decimals);
                let sign = if exp < 0 {
                    "-"
                } else if plus {
                    "+"
                } else {
                    ""
                };
                (
                    mantissa,
                    format!("{}{:0width$}", sign, exp.unsigned_abs(), width = digits),
                )
            }
            None => (magnitude, String::new()),
        };

        let rounded = format!("{:.*}", decimals, mantissa);
        let (int_raw, frac_raw) = rounded
            .split_once('.')
            .unwrap_or((rounded.as_str(), ""));

        // 小数部: 必須桁（"0"）を超える末尾のゼロを除去
        let mut frac = frac_raw.to_string();
        while frac.len() > decimal_zeros && frac.ends_with('0') {
            frac.pop();
        }

        // 整数部: "#"のみの場合は0を表示しない
        let mut int_part = if int_raw == "0" && integer_min == 0 {
            String::new()
        } else {
            int_raw.to_string()
        };
        while int_part.len() < integer_min {
            int_part.insert(0, '0');
        }
        if grouping {
            int_part = Self::add_thousand_separators(&int_part);
        }

        let is_zero = rounded.chars().all(|c| c == '0' || c == '.');

        // トークンを順に処理して結果を構築
        let mut result = String::new();
        if negative && !is_zero {
            result.push('-');
        }
        let mut int_emitted = false;
        let mut frac_emitted = false;
        for token in tokens {
            match token {
                FormatToken::IntegerZero(_) | FormatToken::IntegerHash => {
                    if !int_emitted {
                        result.push_str(&int_part);
                        int_emitted = true;
                    }
                }
                FormatToken::DecimalPoint => result.push('.'),
                FormatToken::DecimalZero(_) | FormatToken::DecimalHash => {
                    if !frac_emitted {
                        result.push_str(&frac);
                        frac_emitted = true;
                    }
                }
                FormatToken::Percent => result.push('%'),
                FormatToken::Exponent { .. } => {
                    result.push('E');
                    result.push_str(&exponent_str);
                }
                FormatToken::Literal(s) => result.push_str(s),
                FormatToken::Letter(c) => result.push(*c),
                _ => {
                    // 色指定などは無視
                }
            }
        }

        result
    }

    /// 仮数（1以上10未満）と10進指数に分解
    ///
    /// 丸めで仮数が10に達する場合は指数を繰り上げます。
    fn split_exponent(magnitude: f64, decimals: usize) -> (f64, i32) {
        if magnitude == 0.0 || !magnitude.is_finite() {
            return (magnitude, 0);
        }
        let mut exp = magnitude.log10().floor() as i32;
        let mut mantissa = magnitude / 10f64.powi(exp);
        let scale = 10f64.powi(decimals as i32);
        if (mantissa * scale).round() / scale >= 10.0 {
            mantissa /= 10.0;
            exp += 1;
        }
        (mantissa, exp)
    }

    /// General書式
    ///
    /// 整数はそのまま、小数は最大10桁、絶対値が1e11以上または1e-9未満は
    /// 仮数5桁の指数表記（例: "1.23457E+11"）で表示します。
    pub fn format_general(value: f64) -> String {
        if value == 0.0 {
            return "0".to_string();
        }
        if !value.is_finite() {
            return value.to_string();
        }

        let abs = value.abs();
        if !(GENERAL_SCIENTIFIC_LOWER..GENERAL_SCIENTIFIC_UPPER).contains(&abs) {
            let formatted = format!("{:.5E}", value);
            let (mantissa, exponent) = formatted
                .split_once('E')
                .unwrap_or((formatted.as_str(), "0"));
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            return format!("{}E{}{:02}", mantissa, sign, exp.unsigned_abs());
        }

        if value.fract() == 0.0 {
            return format!("{}", value as i64);
        }

        let formatted = format!("{:.10}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }

    /// 千の位区切りを追加
    ///
    /// # 引数
    ///
    /// * `s` - 数字のみの文字列
    fn add_thousand_separators(s: &str) -> String {
        let mut result = String::new();
        let chars: Vec<char> = s.chars().collect();
        let len = chars.len();

        for (i, ch) in chars.iter().enumerate() {
            result.push(*ch);
            // 右から3桁ごとにカンマを追加（ただし最後の桁の後は追加しない）
            #[allow(clippy::manual_is_multiple_of)]
            if (len - i - 1) % 3 == 0 && i < len - 1 {
                result.push(',');
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(format: &str) -> Vec<FormatToken> {
        FormatParser::parse(format).sections()[0].tokens.clone()
    }

    fn fmt(format: &str, value: f64) -> String {
        FormatParser::parse(format).format_number(value)
    }

    #[test]
    fn test_split_sections() {
        let sections = FormatParser::split_sections("0;0;0;@");
        assert_eq!(sections, vec!["0", "0", "0", "@"]);

        let sections2 = FormatParser::split_sections("0.00");
        assert_eq!(sections2, vec!["0.00"]);

        // 引用符・ブラケット・エスケープ内の';'は区切りではない
        let sections3 = FormatParser::split_sections("\"a;b\"0;[<0;]0;\\;0");
        assert_eq!(sections3, vec!["\"a;b\"0", "[<0;]0", "\\;0"]);
    }

    #[test]
    fn test_parse_simple_number() {
        assert_eq!(tokens("0"), vec![FormatToken::IntegerZero(1)]);
        assert_eq!(
            tokens("0.00"),
            vec![
                FormatToken::IntegerZero(1),
                FormatToken::DecimalPoint,
                FormatToken::DecimalZero(2)
            ]
        );
    }

    #[test]
    fn test_parse_empty_and_general() {
        assert_eq!(tokens(""), vec![FormatToken::General]);
        assert_eq!(tokens("General"), vec![FormatToken::General]);
        assert_eq!(tokens("GENERAL"), vec![FormatToken::General]);
    }

    #[test]
    fn test_parse_date_tokens() {
        assert_eq!(
            tokens("yyyy-mm-dd"),
            vec![
                FormatToken::Year(4),
                FormatToken::Literal("-".to_string()),
                FormatToken::Month(2),
                FormatToken::Literal("-".to_string()),
                FormatToken::Day(2),
            ]
        );
    }

    #[test]
    fn test_parse_minute_vs_month() {
        assert_eq!(
            tokens("h:mm:ss"),
            vec![
                FormatToken::Hour(1),
                FormatToken::Literal(":".to_string()),
                FormatToken::Minute(2),
                FormatToken::Literal(":".to_string()),
                FormatToken::Second(2),
            ]
        );
        assert_eq!(tokens("mm:ss")[0], FormatToken::Minute(2));
        assert_eq!(tokens("mmm d")[0], FormatToken::Month(3));
        assert!(tokens("yyyy-mm-dd hh:mm")
            .iter()
            .any(|t| *t == FormatToken::Minute(2)));
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(tokens("[h]:mm")[0], FormatToken::Hour(1));
        assert_eq!(tokens("[mm]:ss")[0], FormatToken::Minute(2));
        assert_eq!(
            tokens("[Red]0"),
            vec![FormatToken::Color("Red".to_string()), FormatToken::IntegerZero(1)]
        );
        assert_eq!(tokens("[$€-407]#,##0")[0], FormatToken::Literal("€".to_string()));
        assert_eq!(tokens("[$-409]0"), vec![FormatToken::IntegerZero(1)]);
        assert_eq!(tokens("[>100]0"), vec![FormatToken::IntegerZero(1)]);
    }

    #[test]
    fn test_parse_am_pm_and_letters() {
        assert!(tokens("h:mm AM/PM").contains(&FormatToken::AmPm));
        assert!(tokens("h:mm a/p").contains(&FormatToken::AmPm));
        assert_eq!(tokens("0B"), vec![FormatToken::IntegerZero(1), FormatToken::Letter('B')]);
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(
            tokens("0.00E+00"),
            vec![
                FormatToken::IntegerZero(1),
                FormatToken::DecimalPoint,
                FormatToken::DecimalZero(2),
                FormatToken::Exponent {
                    plus: true,
                    digits: 2
                },
            ]
        );
    }

    // 数値書式のテスト
    #[test]
    fn test_format_number_integer() {
        assert_eq!(fmt("0", 123.0), "123");
        assert_eq!(fmt("0", 0.0), "0");
        assert_eq!(fmt("0", 999.6), "1000");
        assert_eq!(fmt("000", 7.0), "007");
    }

    #[test]
    fn test_format_number_decimal() {
        assert_eq!(fmt("0.00", 123.456), "123.46");
        assert_eq!(fmt("0.00", 0.1), "0.10");
        assert_eq!(fmt("0.00", 999.999), "1000.00");
        assert_eq!(fmt("0.0", -0.04), "0.0");
    }

    #[test]
    fn test_format_number_hash() {
        assert_eq!(fmt("#.##", 0.5), ".5");
        assert_eq!(fmt("#.##", 1.0), "1.");
        assert_eq!(fmt("0.0#", 2.5), "2.5");
        assert_eq!(fmt("0.0#", 2.567), "2.57");
    }

    #[test]
    fn test_format_number_percent() {
        assert_eq!(fmt("0.00%", 0.1234), "12.34%");
        assert_eq!(fmt("0%", -0.5), "-50%");
    }

    #[test]
    fn test_format_number_thousand_separator() {
        assert_eq!(fmt("#,##0", 1234.0), "1,234");
        assert_eq!(fmt("#,##0", 1_234_567.0), "1,234,567");
        assert_eq!(fmt("#,##0", 12.0), "12");
        assert_eq!(fmt("#,##0.00", 1234.5), "1,234.50");
    }

    #[test]
    fn test_format_number_scaling() {
        assert_eq!(fmt("#,##0,", 1_234_567.0), "1,235");
        assert_eq!(fmt("0.0,,", 1_500_000.0), "1.5");
    }

    #[test]
    fn test_format_number_currency() {
        assert_eq!(fmt("\"$\"#,##0.00", 1234.56), "$1,234.56");
        assert_eq!(fmt("\"$\"#,##0.00", -1234.56), "-$1,234.56");
        assert_eq!(fmt("\\$0", 5.0), "$5");
    }

    #[test]
    fn test_format_number_negative_section() {
        assert_eq!(fmt("0;-0", 123.0), "123");
        assert_eq!(fmt("0;-0", -123.0), "-123");
        assert_eq!(fmt("0;(0)", -5.0), "(5)");
        assert_eq!(fmt("#,##0;[Red]-#,##0", -1234.0), "-1,234");
    }

    #[test]
    fn test_format_number_zero_section() {
        assert_eq!(fmt("0;0;\"-\"", 0.0), "-");
        assert_eq!(fmt("0;0;\"-\"", 3.0), "3");
    }

    #[test]
    fn test_format_text_section_ignored() {
        assert_eq!(fmt("0.0;@", 1.26), "1.3");
        assert_eq!(fmt("0;0;0;\"text\"@", 4.0), "4");
    }

    #[test]
    fn test_format_padding_literals() {
        assert_eq!(fmt("_(0_)", 5.0), " 5 ");
        assert_eq!(fmt("* #,##0", 1000.0), "1,000");
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(fmt("0.00E+00", 12345.0), "1.23E+04");
        assert_eq!(fmt("0.00E+00", 0.00012), "1.20E-04");
        assert_eq!(fmt("0.00E+00", 0.0), "0.00E+00");
        assert_eq!(fmt("0.0E+0", 9.99), "1.0E+1");
    }

    #[test]
    fn test_format_general() {
        assert_eq!(fmt("General", 1.5), "1.5");
        assert_eq!(fmt("General", 44197.0), "44197");
        assert_eq!(fmt("General", -3.25), "-3.25");
        assert_eq!(fmt("General", 0.1 + 0.2), "0.3");
        assert_eq!(fmt("General", 1e12), "1E+12");
        assert_eq!(fmt("General", 123_456_789_012.0), "1.23457E+11");
        assert_eq!(fmt("General", 1.5e-10), "1.5E-10");
    }

    #[test]
    fn test_format_datetime_section_falls_back_to_general() {
        assert_eq!(fmt("yyyy-mm-dd", 44197.0), "44197");
        assert_eq!(fmt("h:mm", 0.5), "0.5");
    }

    #[test]
    fn test_format_text_placeholder() {
        assert_eq!(fmt("@", 12.5), "12.5");
    }

    #[test]
    fn test_format_mixed_literal() {
        assert_eq!(fmt("0\" units\"", 3.0), "3 units");
        assert_eq!(fmt("0.0\"%\"", 3.0), "3.0%");
    }
}
