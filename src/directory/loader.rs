use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::record::{Dataset, Record};
use crate::app::SourceConfig;
use crate::utils::DirectoryError;

/// Somewhere a published staff sheet can be read from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Read the whole document body. One outbound read per call.
    async fn fetch_text(&self) -> Result<String, DirectoryError>;

    /// Human-readable location for logs and status lines
    fn location(&self) -> String;
}

/// Published sheet served over HTTP(S)
pub struct HttpSheetSource {
    client: Client,
    url: String,
}

impl HttpSheetSource {
    /// Create a source with an optional request timeout
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, DirectoryError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DirectoryError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_text(&self) -> Result<String, DirectoryError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DirectoryError::FetchError(format!("could not reach {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::FetchError(format!(
                "{} returned HTTP {}",
                self.url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DirectoryError::FetchError(format!("failed reading body: {}", e)))
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Local CSV export, for offline use
pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SheetSource for FileSheetSource {
    async fn fetch_text(&self) -> Result<String, DirectoryError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DirectoryError::FetchError(format!("could not read {}: {}", self.path.display(), e))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Build the configured source. A local path wins over a URL.
pub fn source_from_config(config: &SourceConfig) -> Result<Arc<dyn SheetSource>, DirectoryError> {
    if let Some(path) = &config.csv_path {
        return Ok(Arc::new(FileSheetSource::new(path)));
    }

    match config.csv_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            let timeout = match config.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
            Ok(Arc::new(HttpSheetSource::new(url, timeout)?))
        }
        _ => Err(DirectoryError::ConfigError(
            "no data source configured; set source.csv_url or pass --url / --file".to_string(),
        )),
    }
}

/// Fetch and parse. Either failure aborts the whole load.
pub async fn load_dataset(source: &dyn SheetSource) -> Result<Dataset, DirectoryError> {
    let location = source.location();
    info!("Fetching staff sheet from {}", location);

    let text = source.fetch_text().await?;
    let dataset = parse_csv(&text)?;

    info!("Loaded {} records from {}", dataset.len(), location);
    Ok(dataset)
}

/// Parse CSV text with the first row as header.
///
/// Blank lines are skipped. Short rows leave the remaining fields empty and
/// cells past the header row are dropped; neither is an error.
pub fn parse_csv(text: &str) -> Result<Dataset, DirectoryError> {
    let text = text.trim_start_matches('\u{feff}');
    check_quotes(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DirectoryError::ParseError(format!("failed to read header row: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            DirectoryError::ParseError(format!("failed to parse row {}: {}", index + 2, e))
        })?;

        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() > headers.len() {
            debug!(
                "Row {} has {} cells for {} headers; extra cells dropped",
                index + 2,
                row.len(),
                headers.len()
            );
        }

        let mut record = Record::default();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if !header.is_empty() {
                record.set(header, cell);
            }
        }
        records.push(record);
    }

    let dataset = Dataset::new(headers, records);
    let missing = dataset.missing_headers();
    if !missing.is_empty() && !dataset.headers.is_empty() {
        warn!("Sheet is missing expected columns: {}", missing.join(", "));
    }

    Ok(dataset)
}

/// Reject a quoted field that never closes; the reader would otherwise
/// swallow the rest of the document into one cell.
fn check_quotes(text: &str) -> Result<(), DirectoryError> {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1;
    let mut opened_on = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                opened_on = line;
                at_field_start = false;
            }
            ',' | '\n' | '\r' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(DirectoryError::ParseError(format!(
            "unterminated quoted field starting on line {}",
            opened_on
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SHEET: &str = "Nama,Gred,Pengkhususan,Kelulusan,Gambar,Telefon\n\
                         Ali bin Ahmad,DG41,Matematik,Ijazah Sarjana Muda,https://img/ali.jpg,012\n\
                         \n\
                         Siti,DG44,Bahasa Melayu,Ijazah Sarjana,,\n";

    /// Accept one connection and answer it with a canned response
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/sheet.csv", addr)
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_parse_maps_headers_and_skips_blank_lines() {
        let dataset = parse_csv(SHEET).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.headers.len(), 6);

        let ali = &dataset.records()[0];
        assert_eq!(ali.name, "Ali bin Ahmad");
        assert_eq!(ali.grade, "DG41");
        assert_eq!(ali.qualification, "Ijazah Sarjana Muda");
        assert_eq!(ali.get("Telefon"), Some("012"));

        let siti = &dataset.records()[1];
        assert_eq!(siti.specialization, "Bahasa Melayu");
        assert_eq!(siti.photo_url, "");
        assert_eq!(siti.get("Telefon"), Some(""));
    }

    #[test]
    fn test_parse_tolerates_ragged_rows() {
        let text = "Nama,Gred,Pengkhususan\nAli\nSiti,DG44,Sains,extra,cells\n";
        let dataset = parse_csv(text).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].name, "Ali");
        assert_eq!(dataset.records()[0].grade, "");
        assert_eq!(dataset.records()[1].specialization, "Sains");
        assert!(dataset.records()[1].extra.is_empty());
    }

    #[test]
    fn test_parse_quoted_fields_and_bom() {
        let text = "\u{feff}Nama,Kelulusan\n\"Tan, Mei Ling\",\"Ijazah \"\"Kepujian\"\"\"\n";
        let dataset = parse_csv(text).unwrap();

        assert_eq!(dataset.headers[0], "Nama");
        assert_eq!(dataset.records()[0].name, "Tan, Mei Ling");
        assert_eq!(dataset.records()[0].qualification, "Ijazah \"Kepujian\"");
    }

    #[test]
    fn test_parse_empty_document() {
        let dataset = parse_csv("").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.headers.is_empty());

        let header_only = parse_csv("Nama,Gred\n").unwrap();
        assert!(header_only.is_empty());
    }

    #[test]
    fn test_parse_rejects_unterminated_quote() {
        let text = "Nama,Gred\n\"Ali,DG41\nSiti,DG44\n";
        let err = parse_csv(text).unwrap_err();
        assert!(matches!(err, DirectoryError::ParseError(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_inner_quotes_in_unquoted_field_are_literal() {
        let dataset = parse_csv("Nama\nAli \"Cikgu\" Ahmad\n").unwrap();
        assert_eq!(dataset.records()[0].name, "Ali \"Cikgu\" Ahmad");
    }

    #[tokio::test]
    async fn test_load_dataset_uses_source_once() {
        let mut source = MockSheetSource::new();
        source
            .expect_fetch_text()
            .times(1)
            .returning(|| Ok(SHEET.to_string()));
        source
            .expect_location()
            .returning(|| "mock://sheet".to_string());

        let dataset = load_dataset(&source).await.unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[tokio::test]
    async fn test_load_dataset_propagates_fetch_error() {
        let mut source = MockSheetSource::new();
        source
            .expect_fetch_text()
            .returning(|| Err(DirectoryError::FetchError("offline".to_string())));
        source
            .expect_location()
            .returning(|| "mock://sheet".to_string());

        let err = load_dataset(&source).await.unwrap_err();
        assert!(matches!(err, DirectoryError::FetchError(_)));
    }

    #[tokio::test]
    async fn test_http_source_reads_body() {
        let body = "Nama,Gred\nAli,DG41\n";
        let url = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ))
        .await;

        let source = HttpSheetSource::with_client(local_client(), url);
        let dataset = load_dataset(&source).await.unwrap();
        assert_eq!(dataset.records()[0].name, "Ali");
    }

    #[tokio::test]
    async fn test_http_error_status_is_fetch_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;

        let source = HttpSheetSource::with_client(local_client(), url);
        let err = source.fetch_text().await.unwrap_err();
        assert!(matches!(err, DirectoryError::FetchError(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpSheetSource::with_client(local_client(), format!("http://{}/", addr));
        let err = source.fetch_text().await.unwrap_err();
        assert!(matches!(err, DirectoryError::FetchError(_)));
    }

    #[tokio::test]
    async fn test_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SHEET).unwrap();

        let source = FileSheetSource::new(file.path());
        let dataset = load_dataset(&source).await.unwrap();
        assert_eq!(dataset.len(), 2);

        let missing = FileSheetSource::new("/definitely/not/here.csv");
        assert!(matches!(
            missing.fetch_text().await,
            Err(DirectoryError::FetchError(_))
        ));
    }

    #[test]
    fn test_source_from_config() {
        let none = SourceConfig::default();
        assert!(matches!(
            source_from_config(&none),
            Err(DirectoryError::ConfigError(_))
        ));

        let url = SourceConfig {
            csv_url: Some("https://example.org/pub?output=csv".to_string()),
            ..SourceConfig::default()
        };
        assert_eq!(
            source_from_config(&url).unwrap().location(),
            "https://example.org/pub?output=csv"
        );

        let both = SourceConfig {
            csv_path: Some(PathBuf::from("guru.csv")),
            ..url
        };
        assert_eq!(source_from_config(&both).unwrap().location(), "guru.csv");
    }
}
