use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const POST_CODE_COLUMN: &str = "Post code";
const GEO_POINT_COLUMN: &str = "Geo Point";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Substituted whenever a postal code has no entry in the table.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    latitude: 50.8503,
    longitude: 4.3517,
};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("failed to open geocode table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("geocode table has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("failed to read geocode table: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct GeorefRow {
    #[serde(rename = "Post code")]
    post_code: String,
    #[serde(rename = "Geo Point")]
    geo_point: String,
}

/// Postal code → coordinates, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct GeocodeTable {
    points: HashMap<u32, Coordinates>,
}

impl GeocodeTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the `;`-delimited Belgian georef export.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GeocodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(
            "Loaded {} postal codes from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeocodeError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in [POST_CODE_COLUMN, GEO_POINT_COLUMN] {
            if !headers.iter().any(|h| h == column) {
                return Err(GeocodeError::MissingColumn(column));
            }
        }

        let mut table = Self::empty();
        let mut skipped = 0usize;
        for row in rdr.deserialize::<GeorefRow>() {
            let parsed = row.ok().and_then(|r| {
                let code = r.post_code.parse::<u32>().ok()?;
                let point = parse_geo_point(&r.geo_point)?;
                Some((code, point))
            });
            match parsed {
                // Sub-municipalities repeat the postal code; the first row wins.
                Some((code, point)) => {
                    table.points.entry(code).or_insert(point);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("Skipped {} malformed geocode rows", skipped);
        }
        Ok(table)
    }

    pub fn insert(&mut self, post_code: u32, point: Coordinates) {
        self.points.insert(post_code, point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn lookup(&self, zip_code: i64) -> Option<Coordinates> {
        let key = u32::try_from(zip_code).ok()?;
        self.points.get(&key).copied()
    }

    /// Like [`lookup`](Self::lookup), but a miss yields [`DEFAULT_COORDINATES`].
    pub fn resolve(&self, zip_code: i64) -> Coordinates {
        self.lookup(zip_code).unwrap_or(DEFAULT_COORDINATES)
    }
}

/// Parses `"50.8466, 4.3528"` into coordinates.
fn parse_geo_point(text: &str) -> Option<Coordinates> {
    let (lat, lon) = text.split_once(',')?;
    let latitude = lat.trim().parse::<f64>().ok()?;
    let longitude = lon.trim().parse::<f64>().ok()?;
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    valid.then_some(Coordinates {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Post code;Municipality name (French);Geo Point
1000;Bruxelles;50.8466, 4.3528
4000;Liège;50.6326, 5.5797
4000;Glain;50.6400, 5.5400
5000;Namur;not-a-point
abc;Nowhere;50.0, 4.0
";

    #[test]
    fn test_reads_georef_rows() {
        let table = GeocodeTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup(1000),
            Some(Coordinates {
                latitude: 50.8466,
                longitude: 4.3528
            })
        );
        // first row for a repeated code is kept
        assert_eq!(table.lookup(4000).unwrap().latitude, 50.6326);
    }

    #[test]
    fn test_miss_resolves_to_default() {
        let table = GeocodeTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.resolve(5000), DEFAULT_COORDINATES);
        assert_eq!(table.resolve(9999), DEFAULT_COORDINATES);
        assert_eq!(table.resolve(-1), DEFAULT_COORDINATES);
        assert_eq!(GeocodeTable::empty().resolve(1000), DEFAULT_COORDINATES);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let err = GeocodeTable::from_reader("Post code;City\n1000;Bruxelles\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, GeocodeError::MissingColumn("Geo Point")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = GeocodeTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);

        let err = GeocodeTable::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, GeocodeError::Io { .. }));
    }

    #[test]
    fn test_parse_geo_point_rejects_out_of_range() {
        assert!(parse_geo_point("91.0, 4.0").is_none());
        assert!(parse_geo_point("50.0").is_none());
        assert!(parse_geo_point(" 50.5 ,4.25 ").is_some());
    }
}
