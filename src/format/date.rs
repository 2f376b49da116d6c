//! Date Format Module
//!
//! 数値書式が日付・時刻書式かどうかの判定と、Excelシリアル値から日時への変換を提供します。

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::parser::FormatParser;
use super::tokens::FormatToken;
use crate::api::DateSystem;
use crate::error::XlsxStreamError;

/// 日付書式として扱う組み込み書式ID
const BUILTIN_DATE_FORMAT_IDS: [std::ops::RangeInclusive<u16>; 2] = [14..=22, 45..=47];

/// 9999-12-31の翌日のシリアル値（1900年システム）
const MAX_SERIAL: f64 = 2_958_466.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// 日付書式の構成
///
/// 出力パターンの自動導出に使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateParts {
    /// 年・月・日のみ
    DateOnly,
    /// 時・分・秒のみ
    TimeOnly,
    /// 両方
    DateTime,
}

impl DateParts {
    /// 自動導出される出力パターン（chrono互換）
    pub fn auto_pattern(self) -> &'static str {
        match self {
            DateParts::DateOnly => "%Y-%m-%d",
            DateParts::TimeOnly => "%H:%M:%S",
            DateParts::DateTime => crate::types::DEFAULT_DATETIME_PATTERN,
        }
    }
}

/// 数値書式の分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormatClass {
    /// 数値書式
    Number,
    /// 日付・時刻書式
    Date(DateParts),
    /// 日付トークンと数値トークンが混在し、判定できない書式
    Ambiguous,
}

/// 組み込みの日付書式IDかどうかを判定
pub(crate) fn is_builtin_date_format(format_id: u16) -> bool {
    BUILTIN_DATE_FORMAT_IDS
        .iter()
        .any(|range| range.contains(&format_id))
}

/// 書式を日付・時刻書式か数値書式かに分類
///
/// 正数セクションのトークンで判定します。日付・時刻トークンを含み、
/// 桁記号・パーセント・指数・"@"などの数値トークンを含まない場合に日付書式とみなします。
/// 秒の後の小数部（例: "mm:ss.0"）は日付書式の一部として許容します。
///
/// # 引数
///
/// * `format_id` - 数値書式ID
/// * `parser` - 書式文字列のパース結果
pub(crate) fn classify(format_id: u16, parser: &FormatParser) -> FormatClass {
    let Some(section) = parser.sections().first() else {
        return FormatClass::Number;
    };

    let has_date = section.has_date();
    let has_time = section.has_time();
    let parts = match (has_date, has_time) {
        (true, true) => DateParts::DateTime,
        (true, false) => DateParts::DateOnly,
        (false, true) => DateParts::TimeOnly,
        (false, false) => {
            // 組み込みの日付IDなのに日付トークンがない（書式が上書きされている）
            if is_builtin_date_format(format_id) {
                return FormatClass::Ambiguous;
            }
            return FormatClass::Number;
        }
    };

    let mut seen_second = false;
    let conflict = section.tokens.iter().any(|token| match token {
        FormatToken::Second(_) => {
            seen_second = true;
            false
        }
        FormatToken::DecimalPoint | FormatToken::DecimalZero(_) | FormatToken::DecimalHash => {
            !seen_second
        }
        FormatToken::TextPlaceholder | FormatToken::General => true,
        other => other.is_numeric(),
    });

    if conflict {
        FormatClass::Ambiguous
    } else {
        FormatClass::Date(parts)
    }
}

/// Excelシリアル値を日時に変換
///
/// 時刻部分は秒単位に丸めます。
///
/// # エポックシステム
///
/// - 1900年システム: シリアル値1 = 1900-01-01。存在しない1900-02-29（シリアル値60）を
///   挟むため、シリアル値61以降は1899-12-30起算、60以下は1899-12-31起算
/// - 1904年システム: シリアル値0 = 1904-01-01
///
/// # 戻り値
///
/// * `Ok(NaiveDateTime)` - 変換成功
/// * `Err(XlsxStreamError::DateOutOfRange)` - 負数、非有限値、9999-12-31以降
pub(crate) fn serial_to_datetime(
    serial: f64,
    system: DateSystem,
) -> Result<NaiveDateTime, XlsxStreamError> {
    let out_of_range = || XlsxStreamError::DateOutOfRange(serial);

    if !serial.is_finite() || serial < 0.0 || serial >= MAX_SERIAL {
        return Err(out_of_range());
    }

    let total_seconds = (serial * SECONDS_PER_DAY as f64).round() as i64;
    let days = total_seconds.div_euclid(SECONDS_PER_DAY);
    let seconds = total_seconds.rem_euclid(SECONDS_PER_DAY);

    let epoch = match system {
        DateSystem::V1904 => NaiveDate::from_ymd_opt(1904, 1, 1),
        DateSystem::V1900 if days < 61 => NaiveDate::from_ymd_opt(1899, 12, 31),
        DateSystem::V1900 => NaiveDate::from_ymd_opt(1899, 12, 30),
    }
    .ok_or_else(out_of_range)?;

    epoch
        .checked_add_signed(Duration::days(days))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.checked_add_signed(Duration::seconds(seconds)))
        .ok_or_else(out_of_range)
}
