//! Format Module
//!
//! Excel Number Format Stringの構文解析、日付書式の判定、数値の表示文字列生成を提供します。

mod builtin;
mod date;
mod parser;
mod sections;
mod tokens;

pub(crate) use builtin::builtin_format;
pub(crate) use date::{classify, serial_to_datetime, DateParts, FormatClass};
pub(crate) use parser::FormatParser;
