use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::locale::Lang;
use crate::news::SourceKind;
use crate::report::default_file_name;

/// Search news for keywords, summarize each headline with Gemini, and export an Excel report.
///
/// Environment:
/// - `GEMINI_API_KEY`: required unless `--no-summary`
/// - `GEMINI_MODEL` / `GEMINI_FALLBACK_MODEL`: model selection (optional)
#[derive(Debug, Parser)]
#[command(name = "media-monitor", version)]
pub struct Args {
    /// Keywords separated by commas, e.g. "Foxconn, Fii, EV"
    #[arg(short, long)]
    pub keywords: String,

    /// Look-back window in days
    #[arg(short, long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub days: u32,

    /// News feed to query
    #[arg(long, value_enum, default_value_t = SourceKind::Google)]
    pub source: SourceKind,

    /// Items kept per keyword
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..=50))]
    pub max_per_keyword: u16,

    /// Interface and summary language
    #[arg(long, value_enum, default_value_t = Lang::EnUs)]
    pub lang: Lang,

    /// Skip AI summaries (no API key needed)
    #[arg(long)]
    pub no_summary: bool,

    /// Subject framing for the summary prompt
    #[arg(long, default_value = "business")]
    pub context: String,

    /// Summary requests in flight at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub concurrency: u8,

    /// Keep items that share a link
    #[arg(long)]
    pub keep_duplicates: bool,

    /// Keep feed order instead of sorting newest first
    #[arg(long)]
    pub keep_feed_order: bool,

    /// Workbook path (default: <file-prefix>_News_<YYYYMMDD>.xlsx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File name prefix for the default workbook path
    #[arg(long, default_value = "Media")]
    pub file_prefix: String,

    /// Print the table only
    #[arg(long)]
    pub no_export: bool,
}

impl Args {
    pub fn output_path(&self, today: NaiveDate) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_file_name(&self.file_prefix, today)))
    }
}

/// Splits on ASCII and full-width commas, trims, and drops empty and repeated (case-insensitive) keywords.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split([',', '，', '、'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_trimmed_and_deduplicated() {
        assert_eq!(
            parse_keywords(" Foxconn, Fii ,, foxconn, EV "),
            ["Foxconn", "Fii", "EV"]
        );
    }

    #[test]
    fn full_width_separators_split() {
        assert_eq!(parse_keywords("鴻海，電動車、Fii"), ["鴻海", "電動車", "Fii"]);
    }

    #[test]
    fn blank_input_has_no_keywords() {
        assert!(parse_keywords(" , ,").is_empty());
    }

    #[test]
    fn defaults_apply() {
        let args = Args::try_parse_from(["media-monitor", "-k", "Foxconn"]).unwrap();
        assert_eq!(args.days, 7);
        assert_eq!(args.source, SourceKind::Google);
        assert_eq!(args.max_per_keyword, 5);
        assert_eq!(args.lang, Lang::EnUs);
        assert_eq!(args.concurrency, 1);
        assert!(!args.no_summary);
    }

    #[test]
    fn value_enums_parse() {
        let args = Args::try_parse_from([
            "media-monitor",
            "-k",
            "Foxconn",
            "--source",
            "duckduckgo",
            "--lang",
            "zh-tw",
        ])
        .unwrap();
        assert_eq!(args.source, SourceKind::DuckDuckGo);
        assert_eq!(args.lang, Lang::ZhTw);
    }

    #[test]
    fn day_range_is_bounded() {
        assert!(Args::try_parse_from(["media-monitor", "-k", "x", "--days", "0"]).is_err());
        assert!(Args::try_parse_from(["media-monitor", "-k", "x", "--days", "31"]).is_err());
    }

    #[test]
    fn default_output_path_uses_prefix_and_date() {
        let args =
            Args::try_parse_from(["media-monitor", "-k", "x", "--file-prefix", "Foxconn"]).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            args.output_path(today),
            PathBuf::from("Foxconn_News_20261019.xlsx")
        );
    }

    #[test]
    fn explicit_output_wins() {
        let args = Args::try_parse_from(["media-monitor", "-k", "x", "-o", "out.xlsx"]).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(args.output_path(today), PathBuf::from("out.xlsx"));
    }
}
