//! Problem instance: stops and the travel-time matrix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// A fixed stop to be cleaned. Stop id 0 is the depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub id: usize,
    /// Stops that may only be serviced during the night window.
    pub night_only: bool,
    /// Cleaning time at this stop, in minutes.
    pub service_time: f64,
    /// Coordinates are carried for reporting only; the engine never reads them.
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub fn new(
        id: usize,
        night_only: bool,
        service_time: f64,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Stop {
            id,
            night_only,
            service_time,
            latitude,
            longitude,
        }
    }
}

/// Errors raised while loading or assembling instance data.
///
/// Malformed input is not recoverable; callers are expected to fail fast.
#[derive(Debug)]
pub enum DataError {
    Io(io::Error),
    /// A travel-time row had a different number of columns than the first row.
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A field could not be parsed as a number.
    InvalidNumber {
        line: usize,
        value: String,
    },
    /// The travel-time matrix does not match the stop list.
    DimensionMismatch {
        stops: usize,
        matrix_rows: usize,
        matrix_cols: usize,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(err) => write!(f, "i/o error: {}", err),
            DataError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "ragged travel-time row at line {}: expected {} values, got {}",
                line, expected, found
            ),
            DataError::InvalidNumber { line, value } => {
                write!(f, "unparsable numeric field at line {}: {:?}", line, value)
            }
            DataError::DimensionMismatch {
                stops,
                matrix_rows,
                matrix_cols,
            } => write!(
                f,
                "travel-time matrix is {}x{} but the instance has {} stops",
                matrix_rows, matrix_cols, stops
            ),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DataError {
    fn from(err: io::Error) -> Self {
        DataError::Io(err)
    }
}

/// An immutable scheduling instance: the stop list plus the dense
/// travel-time oracle `d[i][j]` in minutes (not necessarily symmetric).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    stops: Vec<Stop>,
    travel_times: Vec<Vec<f64>>,
}

impl Instance {
    /// Assemble an instance, validating that the matrix is square and
    /// covers every stop.
    pub fn new(stops: Vec<Stop>, travel_times: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let n = stops.len();
        let rows = travel_times.len();
        let cols = travel_times.first().map_or(0, Vec::len);

        if rows != n || travel_times.iter().any(|row| row.len() != n) {
            return Err(DataError::DimensionMismatch {
                stops: n,
                matrix_rows: rows,
                matrix_cols: cols,
            });
        }

        Ok(Instance {
            stops,
            travel_times,
        })
    }

    /// Travel time from stop `from` to stop `to`, in minutes.
    pub fn travel(&self, from: usize, to: usize) -> f64 {
        self.travel_times[from][to]
    }

    pub fn travel_times(&self) -> &[Vec<f64>] {
        &self.travel_times
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, id: usize) -> &Stop {
        &self.stops[id]
    }

    /// Total number of stops, depot included.
    pub fn n_stops(&self) -> usize {
        self.stops.len()
    }

    /// Ids of the non-depot stops belonging to the day or night subset.
    pub fn allowed_indices(&self, night: bool) -> Vec<usize> {
        self.stops
            .iter()
            .skip(1)
            .filter(|stop| stop.night_only == night)
            .map(|stop| stop.id)
            .collect()
    }

    /// Rescale all service times by a constant factor. Preprocessing only;
    /// must not be called once shifts have been built.
    pub fn scale_service_times(&mut self, factor: f64) {
        for stop in &mut self.stops {
            stop.service_time *= factor;
        }
    }

    /// Parse a dense travel-time matrix from a whitespace- or
    /// comma-separated text file. Values are seconds and are converted to
    /// minutes. Rows with a deviating column count abort the load.
    pub fn read_travel_times<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>, DataError> {
        let file = File::open(path)?;
        let reader = io::BufReader::new(file);

        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut expected_cols: Option<usize> = None;

        for (line_idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let fields: Vec<&str> = trimmed
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();

            let cols = *expected_cols.get_or_insert(fields.len());
            if fields.len() != cols {
                return Err(DataError::RaggedRow {
                    line: line_idx + 1,
                    expected: cols,
                    found: fields.len(),
                });
            }

            let mut row = Vec::with_capacity(cols);
            for field in fields {
                let seconds: f64 = field.parse().map_err(|_| DataError::InvalidNumber {
                    line: line_idx + 1,
                    value: field.to_string(),
                })?;
                row.push(seconds / 60.0);
            }
            rows.push(row);
        }

        Ok(rows)
    }
}
