/// Link-list export parameters
///
/// The server builds the document; the client only says what to export
/// and how, then saves the bytes under a derived filename.

use serde::Serialize;

/// Output document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn endpoint(self) -> &'static str {
        match self {
            ExportFormat::Csv => "/api/export-csv",
            ExportFormat::Xlsx => "/api/export-xlsx",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Spreadsheet layout: one link per row, or all links of an article in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XlsxTemplate {
    #[default]
    InRow,
    InCell,
}

impl XlsxTemplate {
    pub const ALL: [XlsxTemplate; 2] = [XlsxTemplate::InRow, XlsxTemplate::InCell];
}

impl std::fmt::Display for XlsxTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XlsxTemplate::InRow => write!(f, "One link per row"),
            XlsxTemplate::InCell => write!(f, "All links in one cell"),
        }
    }
}

/// Separator between links sharing a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Comma,
    Newline,
}

impl Separator {
    pub const ALL: [Separator; 2] = [Separator::Comma, Separator::Newline];

    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::Newline => "\n",
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Separator::Comma => write!(f, "Comma"),
            Separator::Newline => write!(f, "New line"),
        }
    }
}

/// Choices made in the spreadsheet dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XlsxOptions {
    pub template: XlsxTemplate,
    pub separator: Separator,
}

impl XlsxOptions {
    /// The separator only matters for the in-cell layout.
    pub fn shows_separator(&self) -> bool {
        self.template == XlsxTemplate::InCell
    }
}

/// JSON body of an export request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub album_name: String,
    pub article_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_type: Option<XlsxTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<&'static str>,
    #[serde(skip)]
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn csv(album: &str, article: Option<&str>) -> Self {
        Self {
            album_name: album.to_string(),
            article_name: article.map(str::to_string),
            export_type: None,
            separator: None,
            format: ExportFormat::Csv,
        }
    }

    pub fn xlsx(album: &str, article: Option<&str>, options: XlsxOptions) -> Self {
        Self {
            album_name: album.to_string(),
            article_name: article.map(str::to_string),
            export_type: Some(options.template),
            separator: Some(options.separator.as_str()),
            format: ExportFormat::Xlsx,
        }
    }

    /// `links_<album>[_<article>].<ext>`, path separators replaced.
    pub fn filename(&self) -> String {
        let mut name = format!("links_{}", self.album_name);
        if let Some(article) = &self.article_name {
            name.push('_');
            name.push_str(article);
        }
        let name: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}.{}", name, self.format.extension())
    }

    /// Serialise the body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames() {
        assert_eq!(ExportRequest::csv("Summer", None).filename(), "links_Summer.csv");
        assert_eq!(
            ExportRequest::xlsx("Summer", Some("SKU1"), XlsxOptions::default()).filename(),
            "links_Summer_SKU1.xlsx"
        );
        assert_eq!(ExportRequest::csv("a/b", Some("c\\d")).filename(), "links_a_b_c_d.csv");
    }

    #[test]
    fn test_csv_body() {
        let json = ExportRequest::csv("Summer", None).to_json().unwrap();
        assert_eq!(json, r#"{"album_name":"Summer","article_name":null}"#);
    }

    #[test]
    fn test_xlsx_body() {
        let options = XlsxOptions {
            template: XlsxTemplate::InCell,
            separator: Separator::Newline,
        };
        let json = ExportRequest::xlsx("Summer", Some("SKU1"), options).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"album_name":"Summer","article_name":"SKU1","export_type":"in_cell","separator":"\n"}"#
        );
    }

    #[test]
    fn test_default_options() {
        let options = XlsxOptions::default();
        assert_eq!(options.template, XlsxTemplate::InRow);
        assert_eq!(options.separator.as_str(), ", ");
        assert!(!options.shows_separator());
    }
}
