//! Tiny measurement sets for tests, written with casacore.

use std::path::Path;

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use rubbl_casatables::{GlueDataType, Table, TableCreateMode, TableDesc, TableDescCreateMode};

/// Create a table at `path` with scalar columns and `n_rows` empty rows.
fn new_table(path: &Path, name: &str, columns: &[(GlueDataType, &str)], n_rows: usize) -> Table {
    let mut table_desc = TableDesc::new(name, TableDescCreateMode::TDM_SCRATCH).unwrap();
    for &(data_type, column) in columns {
        table_desc
            .add_scalar_column(data_type, column, None, false, false)
            .unwrap();
    }
    Table::new(path, table_desc, n_rows, TableCreateMode::New).unwrap()
}

/// The pieces of a measurement set that [`crate::MsInfo`] looks at.
pub(crate) struct MsBuilder {
    /// (REF_FREQUENCY, TOTAL_BANDWIDTH) of each SPECTRAL_WINDOW row \[Hz\].
    pub(crate) spws: Vec<(f64, f64)>,
    /// SPECTRAL_WINDOW_ID of each DATA_DESCRIPTION row.
    pub(crate) data_descriptions: Vec<i32>,
    /// NAME of each FIELD row.
    pub(crate) fields: Vec<&'static str>,
    /// OBS_MODE of each STATE row.
    pub(crate) states: Vec<&'static str>,
    /// (DATA_DESC_ID, STATE_ID, FIELD_ID) of each main table row.
    pub(crate) rows: Vec<(i32, i32, i32)>,
    /// A required subtable to leave out.
    pub(crate) omit: Option<&'static str>,
}

impl Default for MsBuilder {
    fn default() -> Self {
        MsBuilder {
            spws: vec![(100e9, 2e9), (150e9, 1e9)],
            data_descriptions: vec![0, 1],
            fields: vec!["3C286", "NGC253"],
            states: vec!["CALIBRATE_BANDPASS#ON_SOURCE", "OBSERVE_TARGET#ON_SOURCE"],
            rows: vec![(0, 0, 0), (1, 1, 1)],
            omit: None,
        }
    }
}

impl MsBuilder {
    pub(crate) fn build(&self, ms: &Path) {
        let mut main_table = new_table(
            ms,
            "",
            &[
                (GlueDataType::TpInt, "DATA_DESC_ID"),
                (GlueDataType::TpInt, "STATE_ID"),
                (GlueDataType::TpInt, "FIELD_ID"),
            ],
            self.rows.len(),
        );
        for (i_row, &(data_desc_id, state_id, field_id)) in self.rows.iter().enumerate() {
            let i_row = i_row as u64;
            main_table
                .put_cell("DATA_DESC_ID", i_row, &data_desc_id)
                .unwrap();
            main_table.put_cell("STATE_ID", i_row, &state_id).unwrap();
            main_table.put_cell("FIELD_ID", i_row, &field_id).unwrap();
        }

        let mut subtables = vec![];
        if self.omit != Some("SPECTRAL_WINDOW") {
            let mut table = new_table(
                &ms.join("SPECTRAL_WINDOW"),
                "SPECTRAL_WINDOW",
                &[
                    (GlueDataType::TpDouble, "REF_FREQUENCY"),
                    (GlueDataType::TpDouble, "TOTAL_BANDWIDTH"),
                ],
                self.spws.len(),
            );
            for (i_row, &(ref_freq, bandwidth)) in self.spws.iter().enumerate() {
                let i_row = i_row as u64;
                table.put_cell("REF_FREQUENCY", i_row, &ref_freq).unwrap();
                table.put_cell("TOTAL_BANDWIDTH", i_row, &bandwidth).unwrap();
            }
            subtables.push(("SPECTRAL_WINDOW", table));
        }
        if self.omit != Some("DATA_DESCRIPTION") {
            let mut table = new_table(
                &ms.join("DATA_DESCRIPTION"),
                "DATA_DESCRIPTION",
                &[(GlueDataType::TpInt, "SPECTRAL_WINDOW_ID")],
                self.data_descriptions.len(),
            );
            for (i_row, spw) in self.data_descriptions.iter().enumerate() {
                table
                    .put_cell("SPECTRAL_WINDOW_ID", i_row as u64, spw)
                    .unwrap();
            }
            subtables.push(("DATA_DESCRIPTION", table));
        }
        if self.omit != Some("FIELD") {
            let mut table = new_table(
                &ms.join("FIELD"),
                "FIELD",
                &[(GlueDataType::TpString, "NAME")],
                self.fields.len(),
            );
            for (i_row, name) in self.fields.iter().enumerate() {
                table
                    .put_cell("NAME", i_row as u64, &name.to_string())
                    .unwrap();
            }
            subtables.push(("FIELD", table));
        }
        if self.omit != Some("STATE") {
            let mut table = new_table(
                &ms.join("STATE"),
                "STATE",
                &[(GlueDataType::TpString, "OBS_MODE")],
                self.states.len(),
            );
            for (i_row, obs_mode) in self.states.iter().enumerate() {
                table
                    .put_cell("OBS_MODE", i_row as u64, &obs_mode.to_string())
                    .unwrap();
            }
            subtables.push(("STATE", table));
        }

        for (name, table) in subtables {
            main_table.put_table_keyword(name, table).unwrap();
        }
    }
}

/// Compare a coverage array against expected (lower, upper) pairs.
#[track_caller]
pub(crate) fn assert_coverage(coverage: &Array2<f64>, expected: &[(f64, f64)], epsilon: f64) {
    assert_eq!(coverage.dim(), (expected.len(), 2));
    for (edges, &(lower, upper)) in coverage.outer_iter().zip(expected) {
        assert_abs_diff_eq!(edges[0], lower, epsilon = epsilon);
        assert_abs_diff_eq!(edges[1], upper, epsilon = epsilon);
    }
}
