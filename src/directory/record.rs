use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::constants::{
    HEADER_GRADE, HEADER_NAME, HEADER_PHOTO, HEADER_QUALIFICATION, HEADER_SPECIALIZATION,
    PLACEHOLDER_PORTRAIT_URL, PLACEHOLDER_THUMBNAIL_URL, REQUIRED_HEADERS,
};

/// The statically known columns of the staff sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Grade,
    Specialization,
    Qualification,
    Photo,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Grade,
        Field::Specialization,
        Field::Qualification,
        Field::Photo,
    ];

    /// Header text in the published sheet
    pub fn header(&self) -> &'static str {
        match self {
            Self::Name => HEADER_NAME,
            Self::Grade => HEADER_GRADE,
            Self::Specialization => HEADER_SPECIALIZATION,
            Self::Qualification => HEADER_QUALIFICATION,
            Self::Photo => HEADER_PHOTO,
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.header() == header)
    }
}

/// Which placeholder to use when a record has no photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    /// Small square used in table rows
    Thumbnail,
    /// Large portrait used in the detail popup
    Portrait,
}

impl PhotoKind {
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Thumbnail => PLACEHOLDER_THUMBNAIL_URL,
            Self::Portrait => PLACEHOLDER_PORTRAIT_URL,
        }
    }
}

/// One teacher row. Missing cells are empty strings; unknown columns land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Nama")]
    pub name: String,
    #[serde(rename = "Gred")]
    pub grade: String,
    #[serde(rename = "Pengkhususan")]
    pub specialization: String,
    #[serde(rename = "Kelulusan")]
    pub qualification: String,
    #[serde(rename = "Gambar")]
    pub photo_url: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Store a cell under its header, routing known headers to typed fields
    pub fn set(&mut self, header: &str, value: impl Into<String>) {
        let value = value.into();
        match Field::from_header(header) {
            Some(field) => *self.field_mut(field) = value,
            None => {
                self.extra.insert(header.to_string(), value);
            }
        }
    }

    /// Value of a known field (empty when the cell was missing)
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Grade => &self.grade,
            Field::Specialization => &self.specialization,
            Field::Qualification => &self.qualification,
            Field::Photo => &self.photo_url,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Grade => &mut self.grade,
            Field::Specialization => &mut self.specialization,
            Field::Qualification => &mut self.qualification,
            Field::Photo => &mut self.photo_url,
        }
    }

    /// Lookup by raw header, known or not
    pub fn get(&self, header: &str) -> Option<&str> {
        match Field::from_header(header) {
            Some(field) => Some(self.field(field)),
            None => self.extra.get(header).map(String::as_str),
        }
    }

    /// Photo URL, or the deterministic placeholder when the cell is blank
    pub fn photo_or_placeholder(&self, kind: PhotoKind) -> &str {
        if self.photo_url.trim().is_empty() {
            kind.placeholder()
        } else {
            &self.photo_url
        }
    }
}

/// Immutable snapshot of one successful load
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header row in document order
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    pub loaded_at: Option<DateTime<Local>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            headers,
            records,
            loaded_at: Some(Local::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Required headers absent from the header row
    pub fn missing_headers(&self) -> Vec<&'static str> {
        REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|required| !self.headers.iter().any(|h| h == required))
            .collect()
    }
}
