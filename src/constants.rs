/// Constants module to avoid magic numbers in the codebase

// Spreadsheet headers, verbatim from the published sheet
pub const HEADER_NAME: &str = "Nama";
pub const HEADER_GRADE: &str = "Gred";
pub const HEADER_SPECIALIZATION: &str = "Pengkhususan";
pub const HEADER_QUALIFICATION: &str = "Kelulusan";
pub const HEADER_PHOTO: &str = "Gambar";

pub const REQUIRED_HEADERS: &[&str] = &[
    HEADER_NAME,
    HEADER_GRADE,
    HEADER_SPECIALIZATION,
    HEADER_QUALIFICATION,
    HEADER_PHOTO,
];

// Facet sentinel label ("no filter")
pub const ALL_LABEL: &str = "Semua";

// Photo placeholders
pub const PLACEHOLDER_THUMBNAIL_URL: &str = "https://picsum.photos/100/100?grayscale";
pub const PLACEHOLDER_PORTRAIT_URL: &str = "https://picsum.photos/400/500?grayscale";

// Pagination
pub const PAGE_SIZE_CHOICES: &[usize] = &[10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_WINDOW_THRESHOLD: usize = 5;
pub const PAGE_WINDOW_RADIUS: usize = 2;

// Aggregation
pub const SPECIALIZATION_TOP_N: usize = 10;

// Network Configuration
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// UI Configuration
pub const UI_TICK_RATE_MS: u64 = 50;
pub const UI_TITLE: &str = "DATA GURU SK KLANG GATE";
pub const UI_SUBTITLE: &str = "Sistem Pengurusan Biodata & Maklumat Guru Professional";
pub const UI_FOOTER: &str = "SK KLANG GATE 2026";

// Files
pub const APP_NAME: &str = "dataguru";
pub const LOG_FILE_NAME: &str = "dataguru.log";
pub const LOCAL_CONFIG_PATH: &str = ".dataguru/config.toml";
pub const ENV_PREFIX: &str = "DATAGURU_";
