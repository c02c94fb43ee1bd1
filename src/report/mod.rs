//! Report output: Markdown table for the terminal and an Excel workbook.

mod excel;
mod table;

use chrono::NaiveDate;

pub use excel::write_workbook;
pub use table::format_table;

use crate::news::NewsItem;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to build workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to save workbook: {0}")]
    Io(#[from] std::io::Error),
}

/// `<prefix>_News_<YYYYMMDD>.xlsx`
pub fn default_file_name(prefix: &str, today: NaiveDate) -> String {
    format!("{prefix}_News_{}.xlsx", today.format("%Y%m%d"))
}

pub(crate) fn format_date(item: &NewsItem) -> String {
    item.published
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
