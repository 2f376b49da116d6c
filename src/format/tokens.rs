//! FormatToken Module
//!
//! Excel Number Format Stringのトークン定義を提供します。

/// フォーマットトークン
///
/// Excel Number Format Stringを解析した際に生成されるトークンです。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormatToken {
    /// "General"
    General,

    /// 年（例: "yyyy" -> 4桁, "yy" -> 2桁）
    Year(usize),

    /// 月（例: "mm" -> 2桁, "m" -> 1桁）
    Month(usize),

    /// 日（例: "dd" -> 2桁, "d" -> 1桁）
    Day(usize),

    /// 時（例: "hh" -> 2桁, "[h]" -> 経過時間）
    Hour(usize),

    /// 分（例: "mm" -> 2桁, "m" -> 1桁）
    /// 注意: 日付書式では"mm"は月、時刻書式では"mm"は分
    Minute(usize),

    /// 秒（例: "ss" -> 2桁, "s" -> 1桁）
    Second(usize),

    /// 午前/午後（"AM/PM", "A/P"）
    AmPm,

    /// 整数部のゼロパディング（例: "0" -> 1桁, "00" -> 2桁）
    IntegerZero(usize),

    /// 整数部の任意桁（"#", "?"）
    IntegerHash,

    /// 小数点
    DecimalPoint,

    /// 小数部のゼロパディング（例: "0" -> 1桁, "00" -> 2桁）
    DecimalZero(usize),

    /// 小数部の任意桁（"#", "?"）
    DecimalHash,

    /// 千の位区切り
    ThousandSeparator,

    /// パーセント記号
    Percent,

    /// 指数表記（"E+00", "E-0"）
    Exponent {
        /// 正の指数にも符号を付けるかどうか（"E+"）
        plus: bool,
        /// 指数部の最小桁数
        digits: usize,
    },

    /// リテラル文字列（例: "$", "-", " ", 引用符やバックスラッシュでエスケープされた文字）
    Literal(String),

    /// 引用されていない未知の英字（例: "G", "e"）
    Letter(char),

    /// 色指定（例: "[Red]", "[Blue]"）。表示時は無視されます
    Color(String),

    /// テキストプレースホルダー（例: "@"）
    TextPlaceholder,
}

impl FormatToken {
    /// トークンが日付関連（年・月・日）かどうかを判定
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            FormatToken::Year(_) | FormatToken::Month(_) | FormatToken::Day(_)
        )
    }

    /// トークンが時刻関連（時・分・秒）かどうかを判定
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            FormatToken::Hour(_) | FormatToken::Minute(_) | FormatToken::Second(_)
        )
    }

    /// トークンが日付・時刻関連かどうかを判定
    pub fn is_datetime(&self) -> bool {
        self.is_date() || self.is_time()
    }

    /// トークンが数値関連かどうかを判定
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FormatToken::IntegerZero(_)
                | FormatToken::IntegerHash
                | FormatToken::DecimalPoint
                | FormatToken::DecimalZero(_)
                | FormatToken::DecimalHash
                | FormatToken::ThousandSeparator
                | FormatToken::Percent
                | FormatToken::Exponent { .. }
        )
    }

    /// 数字を出力するトークン（整数部・小数部）かどうかを判定
    pub fn is_digit(&self) -> bool {
        matches!(
            self,
            FormatToken::IntegerZero(_)
                | FormatToken::IntegerHash
                | FormatToken::DecimalZero(_)
                | FormatToken::DecimalHash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_datetime() {
        assert!(FormatToken::Year(4).is_datetime());
        assert!(FormatToken::Month(2).is_date());
        assert!(FormatToken::Day(2).is_date());
        assert!(FormatToken::Hour(2).is_time());
        assert!(FormatToken::Minute(2).is_time());
        assert!(FormatToken::Second(2).is_time());
        assert!(!FormatToken::Hour(2).is_date());
        assert!(!FormatToken::IntegerZero(1).is_datetime());
        assert!(!FormatToken::AmPm.is_datetime());
        assert!(!FormatToken::Literal("$".to_string()).is_datetime());
    }

    #[test]
    fn test_is_numeric() {
        assert!(FormatToken::IntegerZero(1).is_numeric());
        assert!(FormatToken::IntegerHash.is_numeric());
        assert!(FormatToken::DecimalPoint.is_numeric());
        assert!(FormatToken::DecimalZero(2).is_numeric());
        assert!(FormatToken::DecimalHash.is_numeric());
        assert!(FormatToken::ThousandSeparator.is_numeric());
        assert!(FormatToken::Percent.is_numeric());
        assert!(FormatToken::Exponent {
            plus: true,
            digits: 2
        }
        .is_numeric());
        assert!(!FormatToken::Year(4).is_numeric());
        assert!(!FormatToken::General.is_numeric());
        assert!(!FormatToken::Literal("$".to_string()).is_numeric());
    }

    #[test]
    fn test_is_digit() {
        assert!(FormatToken::IntegerZero(1).is_digit());
        assert!(FormatToken::DecimalHash.is_digit());
        assert!(!FormatToken::DecimalPoint.is_digit());
        assert!(!FormatToken::Percent.is_digit());
    }
}
