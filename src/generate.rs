//! Synthetic profile data for demos and local runs.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write sample data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode sample data: {0}")]
    Csv(#[from] csv::Error),
}

/// A row in the loader's column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    pub name: String,
    pub url_image: String,
    pub degree: String,
    pub university: String,
    pub university_country: String,
    pub research_papers: Option<u32>,
}

pub struct ProfileGenerator {
    given_names: Vec<&'static str>,
    family_names: Vec<&'static str>,
    universities: Vec<(&'static str, &'static str)>,
    degrees: Vec<&'static str>,
    seed: u64,
}

impl ProfileGenerator {
    pub fn new(seed: u64) -> Self {
        ProfileGenerator {
            given_names: vec![
                "Ana", "Bruno", "Carla", "Diego", "Elena", "Felipe", "Gabriela", "Hugo",
                "Isabel", "Javier", "Lucia", "Mateo", "Natalia", "Pablo", "Sofia",
            ],
            family_names: vec![
                "Rojas", "Silva", "Torres", "Vargas", "Castro", "Morales", "Herrera",
                "Fuentes", "Navarro", "Pizarro", "Reyes", "Soto",
            ],
            universities: vec![
                ("Universidad de Chile", "Chile"),
                ("Pontificia Universidad Catolica de Chile", "Chile"),
                ("Universidad de Buenos Aires", "Argentina"),
                ("Universidad Nacional Autonoma de Mexico", "Mexico"),
                ("Universidade de Sao Paulo", "Brazil"),
                ("Universidad Complutense de Madrid", "Spain"),
                ("University of Toronto", "Canada"),
            ],
            degrees: vec!["PhD", "MSc", "MBA", "Magister", "Licenciatura"],
            seed,
        }
    }

    /// Rows are drawn in parallel; each row uses its own RNG seeded from the
    /// generator seed and the row number, so output is reproducible.
    pub fn rows(&self, count: usize) -> Vec<SampleRow> {
        (0..count)
            .into_par_iter()
            .map(|row| {
                let stream = (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let mut rng = StdRng::seed_from_u64(self.seed ^ stream);
                self.row(&mut rng)
            })
            .collect()
    }

    fn row(&self, rng: &mut StdRng) -> SampleRow {
        let given = self.given_names.choose(rng).copied().unwrap_or("Ana");
        let family = self.family_names.choose(rng).copied().unwrap_or("Rojas");
        let (university, country) = self
            .universities
            .choose(rng)
            .copied()
            .unwrap_or(("Universidad de Chile", "Chile"));
        let degree = self.degrees.choose(rng).copied().unwrap_or("PhD");
        let name = format!("{given} {family}");
        let slug = name.to_lowercase().replace(' ', "-");

        SampleRow {
            url_image: format!("https://example.org/img/{slug}.jpg"),
            name,
            degree: degree.to_string(),
            university: university.to_string(),
            university_country: country.to_string(),
            // Leave some counts blank so the loader's defaulting is visible
            research_papers: rng.gen_bool(0.9).then(|| rng.gen_range(0..120)),
        }
    }
}

pub fn write_sample_csv(rows: &[SampleRow], writer: impl Write) -> Result<(), GenerateError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    writer.write_record([
        "name",
        "url_image",
        "degree",
        "university",
        "university_country",
        "research_papers",
    ])?;
    for row in rows {
        let papers = row.research_papers.map(|p| p.to_string()).unwrap_or_default();
        writer.write_record([
            row.name.as_str(),
            row.url_image.as_str(),
            row.degree.as_str(),
            row.university.as_str(),
            row.university_country.as_str(),
            papers.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn generate_profile_csv(
    rows: usize,
    seed: u64,
    path: impl AsRef<Path>,
) -> Result<(), GenerateError> {
    let path = path.as_ref();
    let sample = ProfileGenerator::new(seed).rows(rows);
    let file = File::create(path)?;
    write_sample_csv(&sample, BufWriter::new(file))?;
    info!(rows, path = %path.display(), "wrote sample profile CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{LoaderConfig, ProfileTable};

    #[test]
    fn same_seed_same_rows() {
        let a = ProfileGenerator::new(7).rows(50);
        let b = ProfileGenerator::new(7).rows(50);
        assert_eq!(a, b);
        assert_ne!(a, ProfileGenerator::new(8).rows(50));
    }

    #[test]
    fn written_csv_loads_back() {
        let rows = ProfileGenerator::new(1).rows(40);
        let mut buf = Vec::new();
        write_sample_csv(&rows, &mut buf).unwrap();

        let table = ProfileTable::from_reader(buf.as_slice(), &LoaderConfig::default()).unwrap();
        assert!(table.len() <= rows.len());
        assert!(!table.is_empty());
        assert!(table.has_column("university_country"));
        assert_eq!(table.profiles()[0].name, rows[0].name);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.csv");
        generate_profile_csv(10, 3, &path).unwrap();
        let table = ProfileTable::from_path(&path, &LoaderConfig::default()).unwrap();
        assert!(!table.is_empty());
    }
}
