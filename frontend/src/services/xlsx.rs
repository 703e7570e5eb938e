//! Minimal Office Open XML (.xlsx) writer
//!
//! Produces a single worksheet with inline strings, which every spreadsheet
//! application reads without a shared-strings table or styles part.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;
use crate::services::export::Cell;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Excel-style cell reference for 0-based row and column, e.g. (0, 27) -> "AB1"
pub fn cell_reference(row: usize, column: usize) -> String {
    let mut column = column + 1;
    let mut reference = String::new();
    while column > 0 {
        column -= 1;
        reference.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    reference.push_str(&(row + 1).to_string());
    reference
}

/// Encode a one-sheet workbook: a header row followed by the data rows
pub fn write_workbook(
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<Cell>],
) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", content_types()),
        ("_rels/.rels", package_rels()),
        ("xl/workbook.xml", workbook(sheet_name)),
        ("xl/_rels/workbook.xml.rels", workbook_rels()),
        ("xl/worksheets/sheet1.xml", worksheet(headers, rows)),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn content_types() -> String {
    format!(
        concat!(
            "{}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
            "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
            "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
            "<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
            "<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            "</Types>"
        ),
        XML_DECLARATION
    )
}

fn package_rels() -> String {
    format!(
        "{}<Relationships xmlns=\"{}\"><Relationship Id=\"rId1\" Type=\"{}/officeDocument\" Target=\"xl/workbook.xml\"/></Relationships>",
        XML_DECLARATION, PACKAGE_REL_NS, REL_NS
    )
}

fn workbook(sheet_name: &str) -> String {
    format!(
        "{}<workbook xmlns=\"{}\" xmlns:r=\"{}\"><sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
        XML_DECLARATION,
        MAIN_NS,
        REL_NS,
        escape(sheet_name)
    )
}

fn workbook_rels() -> String {
    format!(
        "{}<Relationships xmlns=\"{}\"><Relationship Id=\"rId1\" Type=\"{}/worksheet\" Target=\"worksheets/sheet1.xml\"/></Relationships>",
        XML_DECLARATION, PACKAGE_REL_NS, REL_NS
    )
}

fn worksheet(headers: &[String], rows: &[Vec<Cell>]) -> String {
    let mut xml = format!("{}<worksheet xmlns=\"{}\"><sheetData>", XML_DECLARATION, MAIN_NS);

    let header_cells: Vec<Cell> = headers.iter().map(|h| Cell::Text(h.clone())).collect();
    let all_rows = std::iter::once(&header_cells).chain(rows.iter());

    for (row_index, cells) in all_rows.enumerate() {
        xml.push_str(&format!("<row r=\"{}\">", row_index + 1));
        for (column_index, cell) in cells.iter().enumerate() {
            let reference = cell_reference(row_index, column_index);
            match cell {
                Cell::Text(text) => xml.push_str(&format!(
                    "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    reference,
                    escape(text.as_str())
                )),
                Cell::Number(n) => {
                    xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, n))
                }
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}
