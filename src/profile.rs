//! Profile table loading.
//!
//! Reads a delimited CSV of academic profiles, drops rows without a name,
//! keeps the first row for every repeated name and numbers the survivors
//! `0..N` in file order.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Cell values that count as missing, after trimming. Same set pandas
/// treats as NA by default.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profile CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("profile CSV has no `name` column")]
    MissingNameColumn,
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub delimiter: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig { delimiter: b';' }
    }
}

/// One unique person. Immutable once the table is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: usize,
    pub name: String,
    pub url_image: Option<String>,
    pub degree: Option<String>,
    pub university: Option<String>,
    pub university_country: Option<String>,
    /// Raw cell; parsed when nodes are built.
    pub research_papers: Option<String>,
}

impl Profile {
    /// Value of a table column for this profile, `None` when missing or when
    /// the column is not one the loader knows.
    pub fn column(&self, column: &str) -> Option<&str> {
        match column {
            "name" => Some(self.name.as_str()),
            "url_image" => self.url_image.as_deref(),
            "degree" => self.degree.as_deref(),
            "university" => self.university.as_deref(),
            "university_country" => self.university_country.as_deref(),
            "research_papers" => self.research_papers.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url_image: Option<String>,
    #[serde(default)]
    degree: Option<String>,
    #[serde(default)]
    university: Option<String>,
    #[serde(default)]
    university_country: Option<String>,
    #[serde(default)]
    research_papers: Option<String>,
}

/// Deduplicated profiles plus the header row they were read with.
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    columns: Vec<String>,
    profiles: Vec<Profile>,
}

impl ProfileTable {
    pub fn from_path(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_reader(file, config)?;
        info!(
            path = %path.display(),
            profiles = table.len(),
            "loaded profile table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if !columns.iter().any(|c| c == "name") {
            return Err(LoadError::MissingNameColumn);
        }

        let mut seen = HashSet::new();
        let mut profiles = Vec::new();
        let mut duplicates = 0usize;

        for (row, record) in reader.deserialize::<ProfileRecord>().enumerate() {
            let record = record?;
            let Some(name) = clean(record.name).map(|n| n.trim().to_string()) else {
                warn!(row = row + 1, "skipping profile row without a name");
                continue;
            };
            if !seen.insert(name.clone()) {
                duplicates += 1;
                continue;
            }
            profiles.push(Profile {
                id: profiles.len(),
                name,
                url_image: clean(record.url_image),
                degree: clean(record.degree),
                university: clean(record.university),
                university_country: clean(record.university_country),
                research_papers: clean(record.research_papers),
            });
        }

        if duplicates > 0 {
            info!(duplicates, "dropped repeated profile names");
        }

        Ok(ProfileTable { columns, profiles })
    }

    /// Builds a table directly; ids are reassigned by position.
    pub fn from_profiles(columns: Vec<String>, profiles: Vec<Profile>) -> Self {
        let profiles = profiles
            .into_iter()
            .enumerate()
            .map(|(id, profile)| Profile { id, ..profile })
            .collect();
        ProfileTable { columns, profiles }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Missing-marker check on the trimmed text; kept values stay verbatim.
fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    if NA_MARKERS.contains(&value.trim()) {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> ProfileTable {
        ProfileTable::from_reader(csv.as_bytes(), &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn first_occurrence_of_a_name_wins() {
        let table = load(
            "name;university;research_papers\n\
             Ada;Cambridge;12\n\
             Alan;Princeton;3\n\
             Ada;Oxford;40\n",
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.profiles()[0].university.as_deref(), Some("Cambridge"));
        assert_eq!(table.profiles()[1].name, "Alan");
        assert_eq!(table.profiles()[1].id, 1);
    }

    #[test]
    fn na_markers_become_missing() {
        let table = load("name;degree;university\nAda;NaN; \nAlan;;MIT\n");
        assert_eq!(table.profiles()[0].degree, None);
        assert_eq!(table.profiles()[0].university, None);
        assert_eq!(table.profiles()[1].degree, None);
        assert_eq!(table.profiles()[1].university.as_deref(), Some("MIT"));
    }

    #[test]
    fn padded_values_are_kept_verbatim() {
        let table = load("name;university\nA;X\n B ; X\nC;#N/A\n");
        assert_eq!(table.profiles()[0].university.as_deref(), Some("X"));
        assert_eq!(table.profiles()[1].name, "B");
        assert_eq!(table.profiles()[1].university.as_deref(), Some(" X"));
        assert_eq!(table.profiles()[2].university, None);
    }

    #[test]
    fn missing_optional_columns_are_tolerated() {
        let table = load("name;university\nAda;Cambridge\n");
        assert!(table.has_column("university"));
        assert!(!table.has_column("degree"));
        assert_eq!(table.profiles()[0].degree, None);
    }

    #[test]
    fn rows_without_name_are_skipped() {
        let table = load("name;university\n;Cambridge\nAda;Oxford\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.profiles()[0].id, 0);
    }

    #[test]
    fn name_column_is_required() {
        let err = ProfileTable::from_reader(
            "university;degree\nMIT;PhD\n".as_bytes(),
            &LoaderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MissingNameColumn));
    }

    #[test]
    fn custom_delimiter() {
        let config = LoaderConfig { delimiter: b',' };
        let table = ProfileTable::from_reader("name,degree\nAda,PhD\n".as_bytes(), &config).unwrap();
        assert_eq!(table.profiles()[0].degree.as_deref(), Some("PhD"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ProfileTable::from_path("/nonexistent/profiles.csv", &LoaderConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/profiles.csv"));
    }
}
