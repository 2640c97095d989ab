use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use markup5ever_rcdom::RcDom;
use url::Url;

use crate::parsers::html::{get_charset, html_to_dom, parse_content_type, serialize_document};
use crate::translation::error::TranslationError;

/// Represents errors that can occur while loading, translating or writing a document
#[derive(Debug)]
pub struct GenslateError {
    details: String,
}

impl GenslateError {
    pub fn new(msg: &str) -> GenslateError {
        GenslateError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for GenslateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for GenslateError {}

impl From<TranslationError> for GenslateError {
    fn from(error: TranslationError) -> Self {
        GenslateError::new(&error.to_string())
    }
}

impl From<io::Error> for GenslateError {
    fn from(error: io::Error) -> Self {
        GenslateError::new(&format!("I/O error: {error}"))
    }
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

// Media types accepted as HTML input
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Raw document bytes plus the charset announced by the transport, if any
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub data: Vec<u8>,
    pub charset: Option<String>,
}

/// A parsed document together with the encoding it was decoded with
pub struct LoadedDocument {
    pub dom: RcDom,
    pub encoding: String,
}

/// Reads a document from stdin (`-`), an http(s) URL or a local file
pub async fn read_input(target: &str) -> Result<InputDocument, GenslateError> {
    if target == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return Ok(InputDocument {
            data,
            charset: None,
        });
    }

    if target.starts_with("http://") || target.starts_with("https://") {
        let url = Url::parse(target).map_err(|e| GenslateError::new(&format!("Invalid URL: {e}")))?;
        return fetch_url(url).await;
    }

    let path = Path::new(target);
    if !path.is_file() {
        return Err(GenslateError::new(&format!(
            "Local file {target} does not exist or is not a file"
        )));
    }
    Ok(InputDocument {
        data: fs::read(path)?,
        charset: None,
    })
}

async fn fetch_url(url: Url) -> Result<InputDocument, GenslateError> {
    let response = reqwest::get(url.clone())
        .await
        .map_err(|e| GenslateError::new(&format!("Failed to fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(GenslateError::new(&format!(
            "Failed to fetch {url}: HTTP {}",
            response.status()
        )));
    }

    let (media_type, charset) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(parse_content_type)
        .unwrap_or_default();

    if !media_type.is_empty() && !is_html_media_type(&media_type) {
        return Err(GenslateError::new(&format!(
            "Unsupported media type: {media_type}"
        )));
    }

    let data = response
        .bytes()
        .await
        .map_err(|e| GenslateError::new(&format!("Failed to read {url}: {e}")))?
        .to_vec();

    tracing::debug!("已下载 {} 字节: {}", data.len(), url);

    Ok(InputDocument {
        data,
        charset: Some(charset).filter(|charset| !charset.is_empty()),
    })
}

pub fn is_html_media_type(media_type: &str) -> bool {
    HTML_MEDIA_TYPES.contains(&media_type)
}

/// Parses the input, re-decoding it when a `<meta charset>` disagrees with the first guess
pub fn load_document(input: &InputDocument) -> Result<LoadedDocument, GenslateError> {
    let mut encoding = input
        .charset
        .clone()
        .unwrap_or_else(|| "utf-8".to_string());
    let mut dom = html_to_dom(&input.data, &encoding)?;

    if input.charset.is_none() {
        if let Some(charset) = get_charset(&dom.document) {
            if !charset.eq_ignore_ascii_case(&encoding)
                && encoding_rs::Encoding::for_label(charset.as_bytes()).is_some()
            {
                tracing::debug!("按文档声明的编码重新解析: {}", charset);
                encoding = charset;
                dom = html_to_dom(&input.data, &encoding)?;
            }
        }
    }

    Ok(LoadedDocument { dom, encoding })
}

/// Serializes the document to `output`, or stdout when `output` is `None` or `-`
pub fn write_output(document: &LoadedDocument, output: Option<&str>) -> Result<(), GenslateError> {
    let bytes = serialize_document(&document.dom.document, &document.encoding)?;

    match output {
        None | Some("-") => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
        Some(path) => {
            fs::write(path, bytes)?;
            tracing::info!("已写入: {}", path);
        }
    }

    Ok(())
}

/// Formats output path with title substitution and sanitization
pub fn format_output_path(path: &str, document_title: Option<&str>) -> String {
    let datetime: &str = &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = document_title.unwrap_or("");

    path.replace("%timestamp%", &datetime.replace(':', "_"))
        .replace(
            "%title%",
            title
                .replace(['/', '\\'], "_")
                .replace('<', "[")
                .replace('>', "]")
                .replace(':', " - ")
                .replace('\"', "")
                .replace('|', "-")
                .replace('?', "")
                .trim_start_matches('.'),
        )
}

/// Whether stderr should receive ANSI colors
pub fn use_colors() -> bool {
    use crate::env::{logging, EnvVar};

    atty::is(atty::Stream::Stderr) && !logging::NoColor::get_or_default(false)
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if use_colors() {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stderr
pub fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genslate_error_display() {
        let error = GenslateError::new("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_translation_error_conversion() {
        let error: GenslateError = TranslationError::MissingApiKey.into();
        assert_eq!(error.to_string(), "Translation cancelled. API Key is required.");
    }

    #[test]
    fn test_html_media_types() {
        assert!(is_html_media_type("text/html"));
        assert!(is_html_media_type("application/xhtml+xml"));
        assert!(!is_html_media_type("image/png"));
    }

    #[test]
    fn test_load_document_honours_meta_charset() {
        let input = InputDocument {
            data: b"<html><head><meta charset=\"windows-1252\"></head><body><p>caf\xe9 cr\xe8me</p></body></html>".to_vec(),
            charset: None,
        };
        let document = load_document(&input).unwrap();
        assert_eq!(document.encoding, "windows-1252");
        let html = serialize_document(&document.dom.document, "utf-8").unwrap();
        assert!(String::from_utf8(html).unwrap().contains("café crème"));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let input = InputDocument {
            data: b"<p>Hello there</p>".to_vec(),
            charset: None,
        };
        let document = load_document(&input).unwrap();
        write_output(&document, path.to_str()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<p>Hello there</p>"));
    }

    #[tokio::test]
    async fn test_read_input_missing_file() {
        let error = read_input("/definitely/not/here.html").await.unwrap_err();
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn test_format_output_path_title() {
        assert_eq!(
            format_output_path("%title%.html", Some("Bonjour:le/monde?")),
            "Bonjour - le_monde.html"
        );
        assert_eq!(format_output_path("out.html", None), "out.html");
    }

    #[test]
    fn test_format_output_path_timestamp() {
        let path = format_output_path("page-%timestamp%.html", None);
        assert!(path.starts_with("page-"));
        assert!(!path.contains(':'));
        assert!(!path.contains("%timestamp%"));
    }
}
