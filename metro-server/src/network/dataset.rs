//! Line dataset loading.
//!
//! The dataset is a JSON object keyed by line name:
//!
//! ```json
//! {
//!   "L1": { "color": "#e2231a", "stations": { "A": [0.1, 0.2], "B": [0.15, 0.2] } }
//! }
//! ```
//!
//! Object order is significant: stations are ridden in the order they are
//! listed, so both levels are read as ordered entry lists rather than maps.

use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{LineName, StationName};

use super::error::NetworkError;

/// A station as listed on one line, with its normalized coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEntry {
    pub name: StationName,
    pub coord: [f64; 2],
}

impl StationEntry {
    pub fn new(name: StationName, coord: [f64; 2]) -> Self {
        Self { name, coord }
    }
}

/// One line: its name, display colour and ordered stations.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDefinition {
    pub name: LineName,
    pub color: Option<String>,
    pub stations: Vec<StationEntry>,
}

/// The validated set of line definitions, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDefinitions {
    lines: Vec<LineDefinition>,
}

impl LineDefinitions {
    /// Validate a set of lines.
    ///
    /// Rejects empty datasets, empty lines, duplicate line names,
    /// coordinates outside [0, 1] and stations repeated back-to-back.
    pub fn new(lines: Vec<LineDefinition>) -> Result<Self, NetworkError> {
        if lines.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }

        for (idx, line) in lines.iter().enumerate() {
            if lines[..idx].iter().any(|other| other.name == line.name) {
                return Err(NetworkError::DuplicateLine(line.name.clone()));
            }
            if line.stations.is_empty() {
                return Err(NetworkError::EmptyLine(line.name.clone()));
            }

            for entry in &line.stations {
                if !entry.coord.iter().all(|c| (0.0..=1.0).contains(c)) {
                    return Err(NetworkError::InvalidCoordinate {
                        line: line.name.clone(),
                        station: entry.name.clone(),
                        coord: entry.coord,
                    });
                }
            }

            if let Some(pair) = line.stations.windows(2).find(|w| w[0].name == w[1].name) {
                return Err(NetworkError::RepeatedStation {
                    line: line.name.clone(),
                    station: pair[0].name.clone(),
                });
            }
        }

        Ok(Self { lines })
    }

    /// Parse and validate a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        let raw: OrderedEntries<RawLine> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse and validate a dataset from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, NetworkError> {
        let raw: OrderedEntries<RawLine> = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Load and validate a dataset file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let defs = Self::from_reader(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), lines = defs.len(), "loaded line dataset");
        Ok(defs)
    }

    fn from_raw(raw: OrderedEntries<RawLine>) -> Result<Self, NetworkError> {
        let lines = raw
            .0
            .into_iter()
            .map(|(line_name, raw_line)| {
                let name = LineName::parse(&line_name)
                    .map_err(|source| NetworkError::InvalidName { what: "line", source })?;
                let stations = raw_line
                    .stations
                    .0
                    .into_iter()
                    .map(|(station_name, coord)| {
                        StationName::parse(&station_name)
                            .map(|name| StationEntry::new(name, coord))
                            .map_err(|source| NetworkError::InvalidName {
                                what: "station",
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(LineDefinition {
                    name,
                    color: raw_line.color,
                    stations,
                })
            })
            .collect::<Result<Vec<_>, NetworkError>>()?;

        Self::new(lines)
    }

    /// The lines in dataset order.
    pub fn lines(&self) -> &[LineDefinition] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines. A validated dataset always has one.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Line as it appears in the JSON file.
#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(default)]
    color: Option<String>,
    stations: OrderedEntries<[f64; 2]>,
}

/// A JSON object read as an ordered list of entries.
#[derive(Debug)]
struct OrderedEntries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
