//! Loading a catalogue from a delimited text table.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalogue::{Catalogue, Columns, CoordinateSystem};
use crate::error::QuakecatError;
use crate::geo::utm::lonlat_to_utm;

/// 0-based column indices of the T, X, Y, Z, M fields in the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndices {
    /// Event time column.
    pub t: usize,
    /// First horizontal coordinate column.
    pub x: usize,
    /// Second horizontal coordinate column.
    pub y: usize,
    /// Depth column.
    pub z: usize,
    /// Magnitude column.
    pub m: usize,
}

impl Default for ColumnIndices {
    fn default() -> Self {
        Self {
            t: 0,
            x: 1,
            y: 2,
            z: 3,
            m: 4,
        }
    }
}

/// Options for [`Catalogue::load_csv`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Where the T, X, Y, Z, M fields live in the table. Defaults to the
    /// first five columns in that order.
    pub columns: ColumnIndices,
    /// Field delimiter. Defaults to `,`.
    pub delimiter: u8,
    /// Coordinate system of the X/Y fields in the file. Defaults to
    /// [`CoordinateSystem::Geographic`].
    pub coordinate_system: CoordinateSystem,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            columns: ColumnIndices::default(),
            delimiter: b',',
            coordinate_system: CoordinateSystem::Geographic,
        }
    }
}

impl Catalogue {
    /// Loads events from a delimited text table with one header line
    /// followed by one line per event, replacing the contents of `self`.
    ///
    /// Geographic x/y fields are projected to UTM in bulk after parsing and
    /// the catalogue is tagged [`CoordinateSystem::Projected`], so a loaded
    /// catalogue is always planar. Parsing failures report the offending row
    /// and column via [`QuakecatError::MalformedInput`]; on any failure the
    /// catalogue is left unchanged.
    pub fn load_csv<R: Read>(
        &mut self,
        reader: R,
        options: &CsvOptions,
    ) -> Result<(), QuakecatError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(options.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut t = Vec::new();
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut z = Vec::new();
        let mut m = Vec::new();

        let indices = options.columns;
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let fields = [
                (indices.t, &mut t),
                (indices.x, &mut x),
                (indices.y, &mut y),
                (indices.z, &mut z),
                (indices.m, &mut m),
            ];
            for (column, values) in fields {
                let field = record.get(column).ok_or_else(|| {
                    QuakecatError::MalformedInput {
                        message: format!(
                            "data row {} has {} fields, column {column} requested",
                            row + 1,
                            record.len()
                        ),
                    }
                })?;
                let value: f64 = field.parse().map_err(|_| QuakecatError::MalformedInput {
                    message: format!(
                        "invalid numeric value {field:?} at data row {}, column {column}",
                        row + 1
                    ),
                })?;
                values.push(value);
            }
        }

        let (x, y) = match options.coordinate_system {
            CoordinateSystem::Geographic => lonlat_to_utm(&x, &y)?,
            CoordinateSystem::Projected => (x, y),
        };

        log::debug!("loaded {} events from CSV", t.len());
        self.replace_columns(
            Columns {
                t: Some(t),
                x: Some(x),
                y: Some(y),
                z: Some(z),
                m: Some(m),
            },
            CoordinateSystem::Projected,
        );

        Ok(())
    }

    /// Convenience wrapper around [`Catalogue::load_csv`] reading from a
    /// file path.
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        options: &CsvOptions,
    ) -> Result<Catalogue, QuakecatError> {
        let file = File::open(path)?;
        let mut catalogue = Catalogue::new();
        catalogue.load_csv(BufReader::new(file), options)?;

        Ok(catalogue)
    }

    /// Loading from spreadsheet files is not supported; always fails with
    /// [`QuakecatError::Unimplemented`].
    pub fn load_xlsx(&mut self) -> Result<(), QuakecatError> {
        Err(QuakecatError::Unimplemented("XLSX catalogue loading"))
    }
}
