//! Numeric Value Formatter
//!
//! 数値リテラルと数値書式から、セルの`(string_value, typed_value)`を生成するモジュール。
//!
//! - 日付書式: シリアル値を日時に変換し、`DateFormat`に従って文字列化
//! - それ以外: 書式適用後の表示文字列と元のリテラルのうち短い方を採用し、
//!   指数表記と末尾ゼロを含まない10進表記に正規化

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};

use crate::api::{DateFormat, DateSystem};
use crate::error::XlsxStreamError;
use crate::format::{self, DateParts, FormatClass, FormatParser};
use crate::types::CellValue;

/// 正規化で展開する指数の上限（これを超える値は元のリテラルのまま）
const MAX_PLAIN_EXPONENT: i64 = 400;

/// 数値フォーマッター
///
/// 書式文字列のパース結果をキャッシュします。1つのシートパーサーが所有します。
#[derive(Debug)]
pub(crate) struct NumericFormatter {
    /// 日付システム
    date_system: DateSystem,

    /// 日付の出力形式
    date_format: DateFormat,

    /// 書式文字列ごとのパース結果
    cache: HashMap<String, FormatParser>,
}

impl NumericFormatter {
    /// 新しいNumericFormatterを生成
    pub fn new(date_system: DateSystem, date_format: DateFormat) -> Self {
        Self {
            date_system,
            date_format,
            cache: HashMap::new(),
        }
    }

    /// 数値リテラルをフォーマット
    ///
    /// # 引数
    ///
    /// * `raw` - `v`要素の文字データ
    /// * `format_id` - 数値書式ID
    /// * `pattern` - 数値書式文字列（`None`の場合は組み込み書式から解決）
    ///
    /// # 戻り値
    ///
    /// * `Ok((String::new(), None))` - 空のリテラル
    /// * `Ok((string_value, Some(typed_value)))` - 数値または日時
    /// * `Err(XlsxStreamError::NumberParse)` - 数値として解析できない
    pub fn format(
        &mut self,
        raw: &str,
        format_id: u16,
        pattern: Option<&str>,
    ) -> Result<(String, Option<CellValue>), XlsxStreamError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok((String::new(), None));
        }

        let value: f64 = raw
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| XlsxStreamError::NumberParse(raw.to_string()))?;

        let pattern = pattern.or_else(|| format::builtin_format(format_id));
        if let Some(p) = pattern {
            if !self.cache.contains_key(p) {
                self.cache.insert(p.to_string(), FormatParser::parse(p));
            }
        }
        let parser = pattern.and_then(|p| self.cache.get(p));

        if let (Some(parser), Some(p)) = (parser, pattern) {
            match format::classify(format_id, parser) {
                FormatClass::Date(parts) => match format::serial_to_datetime(value, self.date_system) {
                    Ok(datetime) => {
                        let text = self.render_date(datetime, parts);
                        return Ok((text, Some(CellValue::DateTime(datetime))));
                    }
                    Err(e) => {
                        warn!("{}; formatting as plain number", e);
                    }
                },
                FormatClass::Ambiguous => {
                    debug!(
                        "{}; formatting as plain number",
                        XlsxStreamError::AmbiguousNumericFormat(p.to_string())
                    );
                }
                FormatClass::Number => {}
            }
        }

        // 書式適用後の表示文字列（括弧は除去）
        let display: String = parser
            .map(|parser| parser.format_number(value))
            .unwrap_or_else(|| FormatParser::format_general(value))
            .chars()
            .filter(|c| !matches!(c, '(' | ')'))
            .collect();

        // 表示文字列と元のリテラルのうち長くない方を採用
        let candidate = if raw.len() < display.len() {
            raw
        } else {
            display.as_str()
        };

        let negative = value < 0.0;
        let text = match canonicalize_decimal(candidate) {
            Some(text) if text == "0" || text.starts_with('-') == negative => text,
            _ => canonicalize_decimal(raw).unwrap_or_else(|| raw.to_string()),
        };

        Ok((text, Some(CellValue::Number(value))))
    }

    /// ISO 8601形式の日付リテラル（`t="d"`のセル）をフォーマット
    ///
    /// 日付のみ（`2021-01-01`）、日時（`2021-01-01T08:30:00`、末尾の`Z`と小数秒を許容）、
    /// 時刻のみ（`08:30:00`）に対応します。時刻のみの場合の日付はシリアル値0と同じ基準日です。
    ///
    /// # 戻り値
    ///
    /// * `Some((string_value, typed_value))` - 解析成功
    /// * `None` - 解析失敗
    pub fn format_iso_date(&self, text: &str) -> Option<(String, CellValue)> {
        let text = text.trim();
        let text = text.strip_suffix('Z').unwrap_or(text);

        let (datetime, parts) = if text.contains('T') {
            let datetime = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
            (datetime, DateParts::DateTime)
        } else if text.contains(':') {
            let time = NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok()?;
            let date = format::serial_to_datetime(0.0, self.date_system).ok()?.date();
            (date.and_time(time), DateParts::TimeOnly)
        } else {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
            (date.and_hms_opt(0, 0, 0)?, DateParts::DateOnly)
        };

        Some((
            self.render_date(datetime, parts),
            CellValue::DateTime(datetime),
        ))
    }

    /// 日時を設定された出力形式で文字列化
    fn render_date(&self, datetime: NaiveDateTime, parts: DateParts) -> String {
        let pattern = match &self.date_format {
            DateFormat::Custom(pattern) => pattern.as_str(),
            _ => parts.auto_pattern(),
        };

        let mut out = String::new();
        if write!(out, "{}", datetime.format(pattern)).is_err() {
            // 不正な指定子を含む場合は自動形式
            out.clear();
            let _ = write!(out, "{}", datetime.format(parts.auto_pattern()));
        }
        out
    }
}

/// 数値文字列を、指数表記と末尾ゼロを含まない10進表記に正規化
///
/// 例: `"1.50000"` -> `"1.5"`, `"1.5E-7"` -> `"0.00000015"`, `"-0"` -> `"0"`
///
/// # 戻り値
///
/// * `Some(String)` - 正規化成功
/// * `None` - 符号・数字・小数点・指数以外の文字を含む場合
pub(crate) fn canonicalize_decimal(text: &str) -> Option<String> {
    let text = text.trim();
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], body[pos + 1..].parse::<i64>().ok()?),
        None => (body, 0),
    };
    if exponent.abs() > MAX_PLAIN_EXPONENT {
        return None;
    }

    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    if !int_digits.bytes().all(|b| b.is_ascii_digit())
        || !frac_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    // 小数点の位置（digitsの先頭からの桁数）
    let mut digits = format!("{}{}", int_digits, frac_digits);
    let mut point = int_digits.len() as i64 + exponent;

    let leading = digits.len() - digits.trim_start_matches('0').len();
    digits.drain(..leading);
    point -= leading as i64;
    let significant = digits.trim_end_matches('0').len();
    digits.truncate(significant);

    if digits.is_empty() {
        return Some("0".to_string());
    }

    let plain = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{}.{}", int_part, frac_part)
    };

    Some(if negative {
        format!("-{}", plain)
    } else {
        plain
    })
}
