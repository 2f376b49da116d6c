//! XML Event Driver
//!
//! quick-xmlの`NsReader`からイベントを読み取り、シートパーサーへ供給します。

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::SheetParser;
use crate::error::XlsxStreamError;
use crate::sink::SheetSink;

impl<'a, S: SheetSink> SheetParser<'a, S> {
    /// ワークシートパーツのXML全体を解析
    ///
    /// 自己終了タグは開始と終了の2イベントに、テキストとCDATAは文字データに変換されます。
    /// 入力の終端で`finish`を呼び出します。
    ///
    /// # 引数
    ///
    /// * `reader` - `xl/worksheets/sheetN.xml`の内容
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 解析完了
    /// * `Err(XlsxStreamError::Xml)` - 開始タグと終了タグの不一致など、XMLが構造的に不正な場合
    /// * `Err(XlsxStreamError::Io)` - 読み込みエラー
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxstream::{RowSink, SharedStrings, SheetParserBuilder, StyleTable};
    ///
    /// # fn main() -> Result<(), xlsxstream::XlsxStreamError> {
    /// let strings = SharedStrings::default();
    /// let styles = StyleTable::default();
    /// let mut count = 0;
    /// let sink = RowSink::new(|_row: u32, _values: Vec<String>| {
    ///     count += 1;
    ///     Ok::<(), std::fmt::Error>(())
    /// });
    ///
    /// let mut parser = SheetParserBuilder::new(&strings, &styles).build(sink)?;
    /// parser.parse_xml(r#"<worksheet><sheetData><row/><row/></sheetData></worksheet>"#.as_bytes())?;
    /// drop(parser);
    /// assert_eq!(count, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse_xml<R: BufRead>(&mut self, reader: R) -> Result<(), XlsxStreamError> {
        let mut reader = NsReader::from_reader(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let (resolved, event) = reader
                .read_resolved_event_into(&mut buf)
                .map_err(XlsxStreamError::xml)?;

            let namespace = match &resolved {
                ResolveResult::Bound(ns) => Some(std::str::from_utf8(ns.as_ref())?),
                ResolveResult::Unbound => None,
                // 宣言されていないプレフィックスの要素は対象外
                ResolveResult::Unknown(_) => continue,
            };

            match event {
                Event::Start(e) => self.feed_start(namespace, &e)?,
                Event::Empty(e) => {
                    self.feed_start(namespace, &e)?;
                    let local = e.local_name();
                    self.on_end_element(namespace, std::str::from_utf8(local.as_ref())?);
                }
                Event::End(e) => {
                    let local = e.local_name();
                    self.on_end_element(namespace, std::str::from_utf8(local.as_ref())?);
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(XlsxStreamError::xml)?;
                    self.on_characters(&text);
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    self.on_characters(std::str::from_utf8(&bytes)?);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        self.finish();
        Ok(())
    }

    fn feed_start(
        &mut self,
        namespace: Option<&str>,
        element: &BytesStart<'_>,
    ) -> Result<(), XlsxStreamError> {
        let mut owned = Vec::new();
        for attr in element.attributes() {
            let attr = attr.map_err(XlsxStreamError::xml)?;
            let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr.unescape_value().map_err(XlsxStreamError::xml)?.into_owned();
            owned.push((key, value));
        }
        let attributes: Vec<(&str, &str)> = owned
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();

        let local = element.local_name();
        self.on_start_element(namespace, std::str::from_utf8(local.as_ref())?, &attributes);
        Ok(())
    }
}
