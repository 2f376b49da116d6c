//! FormatSection Module
//!
//! Excel Number Format Stringのセクション定義を提供します。

use super::tokens::FormatToken;

/// セクションの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionKind {
    /// 正数
    Positive,
    /// 負数
    Negative,
    /// ゼロ
    Zero,
    /// テキスト
    Text,
}

impl SectionKind {
    /// セクションの位置（0始まり）から種類を決定
    pub fn from_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(SectionKind::Positive),
            1 => Some(SectionKind::Negative),
            2 => Some(SectionKind::Zero),
            3 => Some(SectionKind::Text),
            _ => None,
        }
    }
}

/// フォーマットのセクション（正数、負数、ゼロ、テキスト）
///
/// Excel Number Format Stringは最大4つのセクションに分割されます:
/// 1. 正数
/// 2. 負数
/// 3. ゼロ
/// 4. テキスト
///
/// 条件付きセクション（例: `[>100]`）は解析時に読み飛ばされます。
#[derive(Debug, Clone)]
pub(crate) struct FormatSection {
    /// セクションの種類
    pub kind: SectionKind,

    /// フォーマットトークン
    pub tokens: Vec<FormatToken>,
}

impl FormatSection {
    /// 新しいセクションを生成
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            tokens: Vec::new(),
        }
    }

    /// 日付部分（年・月・日）を含むかどうかを判定
    pub fn has_date(&self) -> bool {
        self.tokens.iter().any(FormatToken::is_date)
    }

    /// 時刻部分（時・分・秒）を含むかどうかを判定
    pub fn has_time(&self) -> bool {
        self.tokens.iter().any(FormatToken::is_time)
    }

    /// セクションが日付・時刻書式かどうかを判定
    pub fn is_datetime(&self) -> bool {
        self.tokens.iter().any(FormatToken::is_datetime)
    }

    /// セクションが数値書式かどうかを判定
    pub fn is_numeric(&self) -> bool {
        self.tokens.iter().any(FormatToken::is_numeric)
    }

    /// "General"セクションかどうかを判定
    pub fn is_general(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, FormatToken::General))
    }

    /// テキスト専用セクション（"@"のみで数値トークンを含まない）かどうかを判定
    pub fn is_text_only(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, FormatToken::TextPlaceholder))
            && !self.is_numeric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_new() {
        let section = FormatSection::new(SectionKind::Positive);
        assert_eq!(section.kind, SectionKind::Positive);
        assert!(section.tokens.is_empty());
    }

    #[test]
    fn test_from_position() {
        assert_eq!(SectionKind::from_position(0), Some(SectionKind::Positive));
        assert_eq!(SectionKind::from_position(3), Some(SectionKind::Text));
        assert_eq!(SectionKind::from_position(4), None);
    }

    #[test]
    fn test_date_and_time_parts() {
        let mut section = FormatSection::new(SectionKind::Positive);
        section.tokens.push(FormatToken::Year(4));
        section.tokens.push(FormatToken::Month(2));
        section.tokens.push(FormatToken::Day(2));
        assert!(section.is_datetime());
        assert!(section.has_date());
        assert!(!section.has_time());

        let mut section2 = FormatSection::new(SectionKind::Positive);
        section2.tokens.push(FormatToken::Hour(2));
        assert!(section2.has_time());
        assert!(!section2.has_date());
    }

    #[test]
    fn test_is_numeric() {
        let mut section = FormatSection::new(SectionKind::Positive);
        section.tokens.push(FormatToken::IntegerZero(1));
        section.tokens.push(FormatToken::DecimalPoint);
        section.tokens.push(FormatToken::DecimalZero(2));
        assert!(section.is_numeric());

        let mut section2 = FormatSection::new(SectionKind::Positive);
        section2.tokens.push(FormatToken::Year(4));
        assert!(!section2.is_numeric());
    }

    #[test]
    fn test_is_text_only() {
        let mut section = FormatSection::new(SectionKind::Text);
        section.tokens.push(FormatToken::TextPlaceholder);
        assert!(section.is_text_only());

        section.tokens.push(FormatToken::IntegerZero(1));
        assert!(!section.is_text_only());
    }
}
