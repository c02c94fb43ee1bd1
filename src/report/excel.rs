use std::borrow::Cow;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use super::{ReportError, format_date};
use crate::locale::Labels;
use crate::news::NewsItem;

const SHEET_NAME: &str = "News";
const COLUMN_WIDTHS: [f64; 6] = [18.0, 16.0, 60.0, 80.0, 20.0, 50.0];
const LINK_COLUMN: u16 = 5;
/// Excel rejects hyperlinks longer than this; such links are written as text.
const MAX_URL_LEN: usize = 2079;

pub fn write_workbook(path: &Path, items: &[NewsItem], labels: &Labels) -> Result<(), ReportError> {
    let bytes = workbook_bytes(items, labels)?;
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), rows = items.len(), bytes = bytes.len(), "workbook written");
    Ok(())
}

pub fn workbook_bytes(items: &[NewsItem], labels: &Labels) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(items, labels)?;
    Ok(workbook.save_to_buffer()?)
}

fn is_hyperlink(link: &str) -> bool {
    (link.starts_with("http://") || link.starts_with("https://")) && link.len() <= MAX_URL_LEN
}

#[derive(Debug, PartialEq)]
enum CellValue<'a> {
    Text(Cow<'a, str>),
    Url(&'a str),
}

/// One data row in column order Date, Keyword, Title, AI Summary, Source, Link.
fn row_cells(item: &NewsItem) -> [CellValue<'_>; 6] {
    let link = if is_hyperlink(&item.link) {
        CellValue::Url(item.link.as_str())
    } else {
        CellValue::Text(Cow::Borrowed(item.link.as_str()))
    };
    [
        CellValue::Text(Cow::Owned(format_date(item))),
        CellValue::Text(Cow::Borrowed(item.keyword.as_str())),
        CellValue::Text(Cow::Borrowed(item.title.as_str())),
        CellValue::Text(Cow::Borrowed(item.summary.as_deref().unwrap_or_default())),
        CellValue::Text(Cow::Borrowed(item.source.as_str())),
        link,
    ]
}

fn build_workbook(items: &[NewsItem], labels: &Labels) -> Result<Workbook, ReportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in labels.columns().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *title, &header)?;
        worksheet.set_column_width(col, COLUMN_WIDTHS[col as usize])?;
    }

    for (i, item) in items.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in row_cells(item).iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Text(text) => worksheet.write_string(row, col, &**text)?,
                CellValue::Url(url) => worksheet.write_url(row, col, *url)?,
            };
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    if !items.is_empty() {
        worksheet.autofilter(0, 0, items.len() as u32, LINK_COLUMN)?;
    }

    Ok(workbook)
}
