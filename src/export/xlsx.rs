//! XLSX Writer Module
//! Writes a DataFrame as a single-sheet Excel workbook.
//!
//! Uses direct ZIP/XML generation; cells are written as numbers or inline
//! strings so no shared string table is needed.

use crate::data::cell_text;
use polars::prelude::*;
use std::io::{Cursor, Write};
use ::zip::write::FileOptions;
use ::zip::ZipWriter;

use super::ExportError;

/// Name of the only worksheet in the workbook
pub const SHEET_NAME: &str = "Sheet1";

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// XLSX generator for a single table
pub struct XlsxWriter;

impl XlsxWriter {
    /// Serialize `df` to XLSX bytes: header row first, no index column.
    pub fn write_to_bytes(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        // 1. [Content_Types].xml
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml().as_bytes())?;

        // 2. _rels/.rels
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::rels_xml().as_bytes())?;

        // 3. docProps
        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(Self::core_props_xml().as_bytes())?;
        zip.start_file("docProps/app.xml", options)?;
        zip.write_all(Self::app_props_xml().as_bytes())?;

        // 4. Workbook and its relationships
        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(Self::workbook_xml().as_bytes())?;
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(Self::workbook_rels_xml().as_bytes())?;

        // 5. Styles
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(Self::styles_xml().as_bytes())?;

        // 6. The sheet itself
        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(Self::sheet_xml(df)?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#
            .to_string()
    }

    fn rels_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
            .to_string()
    }

    fn core_props_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:creator>Data Sweeper</dc:creator>
</cp:coreProperties>"#
            .to_string()
    }

    fn app_props_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>Data Sweeper</Application>
</Properties>"#
            .to_string()
    }

    fn workbook_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="{}">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            MAIN_NS, REL_NS, SHEET_NAME
        )
    }

    fn workbook_rels_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
            .to_string()
    }

    fn styles_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="{}">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#,
            MAIN_NS
        )
    }

    fn sheet_xml(df: &DataFrame) -> Result<String, ExportError> {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}"><sheetData>"#,
            MAIN_NS
        );

        if df.width() > 0 {
            xml.push_str(r#"<row r="1">"#);
            for (col_idx, name) in df.get_column_names().iter().enumerate() {
                xml.push_str(&Self::string_cell(&Self::cell_ref(col_idx, 1), name.as_str()));
            }
            xml.push_str("</row>");
        }

        let columns: Vec<&Series> = df
            .get_columns()
            .iter()
            .map(|c| c.as_materialized_series())
            .collect();

        for row in 0..df.height() {
            let row_num = row + 2;
            xml.push_str(&format!(r#"<row r="{}">"#, row_num));

            for (col_idx, series) in columns.iter().enumerate() {
                let value = series.get(row)?;
                let cell_ref = Self::cell_ref(col_idx, row_num);

                if let Some(number) = Self::number_text(&value) {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, number));
                } else if let Some(text) = cell_text(&value) {
                    xml.push_str(&Self::string_cell(&cell_ref, &text));
                }
            }

            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        Ok(xml)
    }

    /// Exact text of a numeric cell; non-finite floats are written as text.
    fn number_text(value: &AnyValue) -> Option<String> {
        match value {
            AnyValue::Int8(v) => Some(v.to_string()),
            AnyValue::Int16(v) => Some(v.to_string()),
            AnyValue::Int32(v) => Some(v.to_string()),
            AnyValue::Int64(v) => Some(v.to_string()),
            AnyValue::UInt8(v) => Some(v.to_string()),
            AnyValue::UInt16(v) => Some(v.to_string()),
            AnyValue::UInt32(v) => Some(v.to_string()),
            AnyValue::UInt64(v) => Some(v.to_string()),
            AnyValue::Float32(v) if v.is_finite() => Some(v.to_string()),
            AnyValue::Float64(v) if v.is_finite() => Some(v.to_string()),
            _ => None,
        }
    }

    fn string_cell(cell_ref: &str, text: &str) -> String {
        format!(
            r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            cell_ref,
            Self::escape_xml(text)
        )
    }

    /// A1-style reference for a zero-based column and one-based row.
    fn cell_ref(col_idx: usize, row: usize) -> String {
        let mut letters = Vec::new();
        let mut n = col_idx + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect::<String>() + &row.to_string()
    }

    /// Escape XML special characters and drop characters XML 1.0 forbids.
    fn escape_xml(s: &str) -> String {
        let mut escaped = String::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                '\t' | '\n' | '\r' => escaped.push(ch),
                c if (c as u32) < 0x20 => {}
                c => escaped.push(c),
            }
        }
        escaped
    }
}
