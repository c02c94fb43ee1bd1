/// Interface language: column headers, status messages, and the summary target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Lang {
    #[value(name = "zh-tw")]
    ZhTw,
    #[default]
    #[value(name = "en-us")]
    EnUs,
    #[value(name = "vi-vn")]
    ViVn,
    #[value(name = "es-mx")]
    EsMx,
    #[value(name = "pt-br")]
    PtBr,
}

pub struct Labels {
    pub col_date: &'static str,
    pub col_keyword: &'static str,
    pub col_title: &'static str,
    pub col_summary: &'static str,
    pub col_source: &'static str,
    pub col_link: &'static str,
    pub processing: &'static str,
    pub success: &'static str,
    pub no_results: &'static str,
    pub error_api: &'static str,
    pub error_no_keyword: &'static str,
    pub saved: &'static str,
}

impl Lang {
    /// Language name handed to the model as the summary language.
    pub fn target_language(self) -> &'static str {
        match self {
            Lang::ZhTw => "繁體中文",
            Lang::EnUs => "English",
            Lang::ViVn => "Tiếng Việt",
            Lang::EsMx => "Español",
            Lang::PtBr => "Português",
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Lang::ZhTw => &ZH_TW,
            Lang::EnUs => &EN_US,
            Lang::ViVn => &VI_VN,
            Lang::EsMx => &ES_MX,
            Lang::PtBr => &PT_BR,
        }
    }
}

static ZH_TW: Labels = Labels {
    col_date: "日期",
    col_keyword: "關鍵字",
    col_title: "新聞標題",
    col_summary: "AI 重點摘要",
    col_source: "來源",
    col_link: "連結",
    processing: "正在搜尋新聞並進行 AI 摘要，這需要一點時間...",
    success: "分析完成！",
    no_results: "找不到符合關鍵字的新聞。",
    error_api: "請先輸入 API Key 才能使用 AI 功能！",
    error_no_keyword: "請輸入至少一個關鍵字！",
    saved: "報表已儲存",
};

static EN_US: Labels = Labels {
    col_date: "Date",
    col_keyword: "Keyword",
    col_title: "Title",
    col_summary: "AI Summary",
    col_source: "Source",
    col_link: "Link",
    processing: "Searching and generating AI summaries...",
    success: "Analysis Complete!",
    no_results: "No news found for the given keywords.",
    error_api: "Please enter API Key first!",
    error_no_keyword: "Please enter at least one keyword!",
    saved: "Report saved",
};

static VI_VN: Labels = Labels {
    col_date: "Ngày",
    col_keyword: "Từ khóa",
    col_title: "Tiêu đề",
    col_summary: "Tóm tắt AI",
    col_source: "Nguồn",
    col_link: "Liên kết",
    processing: "Đang tìm kiếm và tạo tóm tắt AI...",
    success: "Hoàn tất phân tích!",
    no_results: "Không tìm thấy tin tức cho các từ khóa đã nhập.",
    error_api: "Vui lòng nhập API Key trước!",
    error_no_keyword: "Vui lòng nhập ít nhất một từ khóa!",
    saved: "Đã lưu báo cáo",
};

static ES_MX: Labels = Labels {
    col_date: "Fecha",
    col_keyword: "Palabra clave",
    col_title: "Título",
    col_summary: "Resumen IA",
    col_source: "Fuente",
    col_link: "Enlace",
    processing: "Buscando y generando resúmenes de IA...",
    success: "¡Análisis completo!",
    no_results: "No se encontraron noticias para las palabras clave.",
    error_api: "¡Ingrese la clave API primero!",
    error_no_keyword: "¡Ingrese al menos una palabra clave!",
    saved: "Informe guardado",
};

static PT_BR: Labels = Labels {
    col_date: "Data",
    col_keyword: "Palavra-chave",
    col_title: "Título",
    col_summary: "Resumo IA",
    col_source: "Fonte",
    col_link: "Link",
    processing: "Pesquisando e gerando resumos de IA...",
    success: "Análise concluída!",
    no_results: "Nenhuma notícia encontrada para as palavras-chave.",
    error_api: "Por favor, insira a chave da API primeiro!",
    error_no_keyword: "Por favor, insira pelo menos uma palavra-chave!",
    saved: "Relatório salvo",
};

impl Labels {
    /// Headers in report column order.
    pub fn columns(&self) -> [&'static str; 6] {
        [
            self.col_date,
            self.col_keyword,
            self.col_title,
            self.col_summary,
            self.col_source,
            self.col_link,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_columns_in_report_order() {
        assert_eq!(
            Lang::EnUs.labels().columns(),
            ["Date", "Keyword", "Title", "AI Summary", "Source", "Link"]
        );
    }

    #[test]
    fn target_language_for_traditional_chinese() {
        assert_eq!(Lang::ZhTw.target_language(), "繁體中文");
    }

    #[test]
    fn every_language_has_non_empty_labels() {
        for lang in [Lang::ZhTw, Lang::EnUs, Lang::ViVn, Lang::EsMx, Lang::PtBr] {
            let labels = lang.labels();
            assert!(labels.columns().iter().all(|c| !c.is_empty()));
            assert!(!labels.error_no_keyword.is_empty());
        }
    }
}
