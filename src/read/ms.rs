//! Read-only metadata queries against a measurement set.

use std::{
    collections::{BTreeSet, HashSet},
    path::{Component, Path, PathBuf},
};

use itertools::{izip, Itertools};
use log::{debug, trace};
use ndarray::prelude::*;
use rubbl_casatables::{Table, TableOpenMode};

use super::{MsError, Pattern, SpwId, REQUIRED_SUBTABLES};

/// Open a casacore table read only.
fn read_table(table: &Path) -> Result<Table, MsError> {
    trace!("Opening table {}", table.display());
    Ok(Table::open(table, TableOpenMode::Read)?)
}

/// Does `table` look like a casacore table directory?
fn is_table_dir(table: &Path) -> bool {
    table.join("table.dat").is_file()
}

/// Is the given table referred to by `name` the main table of a measurement
/// set?
fn is_main(name: &str) -> bool {
    name.eq_ignore_ascii_case("MAIN")
}

/// Is row `id` one of the selected rows? Negative and out-of-range ids never
/// are.
fn row_selected(selected: &[bool], id: i32) -> bool {
    usize::try_from(id)
        .ok()
        .and_then(|i| selected.get(i))
        .copied()
        .unwrap_or(false)
}

pub struct MsInfo {
    /// The path to the measurement set on disk.
    ms: PathBuf,
}

impl MsInfo {
    /// Open a measurement set, verifying that it has all of the subtables we
    /// query (SPECTRAL_WINDOW, DATA_DESCRIPTION, FIELD and STATE).
    pub fn open<P: AsRef<Path>>(ms: P) -> Result<MsInfo, MsError> {
        let ms = ms.as_ref();
        debug!("Using measurement set: {}", ms.display());
        if !ms.exists() {
            return Err(MsError::NotFound(ms.to_path_buf()));
        }

        let ms_info = MsInfo {
            ms: ms.to_path_buf(),
        };
        for subtable in REQUIRED_SUBTABLES {
            if !ms_info.has_subtable(subtable) {
                return Err(MsError::MissingSubtable {
                    ms: ms_info.ms,
                    subtable,
                });
            }
        }
        Ok(ms_info)
    }

    pub fn path(&self) -> &Path {
        &self.ms
    }

    /// Where the table called `name` would live on disk. `None` if `name`
    /// can't possibly be a table of this measurement set (e.g. "../FIELD").
    fn table_path(&self, name: &str) -> Option<PathBuf> {
        if is_main(name) {
            return Some(self.ms.clone());
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(subtable)), None) => Some(self.ms.join(subtable)),
            _ => None,
        }
    }

    /// Does this measurement set have the subtable `name`? "MAIN" (in any
    /// case) refers to the measurement set's main table.
    pub fn has_subtable(&self, name: &str) -> bool {
        let exists = self
            .table_path(name)
            .map(|table| is_table_dir(&table))
            .unwrap_or(false);
        trace!("{}::{name} exists: {exists}", self.ms.display());
        exists
    }

    /// Open the table `name` read only. "MAIN" (in any case) opens the
    /// measurement set's main table.
    pub fn open_table(&self, name: &str) -> Result<Table, MsError> {
        match self.table_path(name) {
            Some(table) if is_table_dir(&table) => read_table(&table),
            _ => Err(MsError::TableNotFound {
                ms: self.ms.clone(),
                name: name.to_string(),
            }),
        }
    }

    /// The number of spectral windows defined in this measurement set (used
    /// or not).
    pub fn num_spws(&self) -> Result<usize, MsError> {
        Ok(self.open_table("SPECTRAL_WINDOW")?.n_rows() as usize)
    }

    /// Get the spectral windows used by main-table rows whose STATE `OBS_MODE`
    /// matches `intent_pattern` and whose FIELD `NAME` matches
    /// `field_name_pattern`. Both patterns must match for the *same* row.
    ///
    /// Unless `exact_match` is set, the patterns are wrapped in wildcards, so
    /// "OBSERVE_TARGET" finds "OBSERVE_TARGET#ON_SOURCE". See
    /// [`Pattern`](super::Pattern) for the syntax.
    ///
    /// The returned IDs are unique and in DATA_DESCRIPTION order. Rows with a
    /// negative STATE_ID or FIELD_ID (i.e. no state or field) never match.
    pub fn spw_ids_used(
        &self,
        intent_pattern: &str,
        field_name_pattern: &str,
        exact_match: bool,
    ) -> Result<Vec<SpwId>, MsError> {
        let (intent, field_name) = if exact_match {
            (
                Pattern::new(intent_pattern)?,
                Pattern::new(field_name_pattern)?,
            )
        } else {
            (
                Pattern::contains(intent_pattern)?,
                Pattern::contains(field_name_pattern)?,
            )
        };
        debug!(
            "Looking for SPWs with intent '{}' and field '{}'",
            intent.as_str(),
            field_name.as_str()
        );

        let obs_modes: Vec<String> = self.open_table("STATE")?.get_col_as_vec("OBS_MODE")?;
        let selected_states: Vec<bool> = obs_modes.iter().map(|m| intent.is_match(m)).collect();
        trace!(
            "{} of {} states match",
            selected_states.iter().filter(|&&s| s).count(),
            selected_states.len()
        );

        let field_names: Vec<String> = self.open_table("FIELD")?.get_col_as_vec("NAME")?;
        let selected_fields: Vec<bool> = field_names
            .iter()
            .map(|n| field_name.is_match(n))
            .collect();
        trace!(
            "{} of {} fields match",
            selected_fields.iter().filter(|&&f| f).count(),
            selected_fields.len()
        );

        let used_data_descs: BTreeSet<usize> = {
            let mut main_table = self.open_table("MAIN")?;
            let data_desc_ids: Vec<i32> = main_table.get_col_as_vec("DATA_DESC_ID")?;
            let state_ids: Vec<i32> = main_table.get_col_as_vec("STATE_ID")?;
            let field_ids: Vec<i32> = main_table.get_col_as_vec("FIELD_ID")?;

            izip!(data_desc_ids, state_ids, field_ids)
                .filter(|&(_, state_id, field_id)| {
                    row_selected(&selected_states, state_id)
                        && row_selected(&selected_fields, field_id)
                })
                .filter_map(|(data_desc_id, _, _)| usize::try_from(data_desc_id).ok())
                .collect()
        };
        trace!("Data descriptions used: {used_data_descs:?}");

        let spw_ids: Vec<i32> = self
            .open_table("DATA_DESCRIPTION")?
            .get_col_as_vec("SPECTRAL_WINDOW_ID")?;
        let spws = spw_ids
            .into_iter()
            .enumerate()
            .filter(|(i_data_desc, _)| used_data_descs.contains(i_data_desc))
            .filter_map(|(_, spw)| SpwId::try_from(spw).ok())
            .unique()
            .collect::<Vec<_>>();
        debug!("SPWs used: {spws:?}");
        Ok(spws)
    }

    /// Get the frequency coverage of spectral windows as a `[n, 2]` array of
    /// (lower, upper) edges \[Hz\], i.e. REF_FREQUENCY -/+ TOTAL_BANDWIDTH / 2.
    ///
    /// If `spw_ids` is `None`, all spectral windows are used. Otherwise only
    /// the given IDs are used; IDs that don't exist are ignored and
    /// duplicates are collapsed.
    ///
    /// The rows are always in SPECTRAL_WINDOW order, *not* the order of
    /// `spw_ids`.
    pub fn spw_coverage(&self, spw_ids: Option<&[SpwId]>) -> Result<Array2<f64>, MsError> {
        let mut spw_table = self.open_table("SPECTRAL_WINDOW")?;
        let ref_freqs: Vec<f64> = spw_table.get_col_as_vec("REF_FREQUENCY")?;
        let total_bandwidths: Vec<f64> = spw_table.get_col_as_vec("TOTAL_BANDWIDTH")?;

        let wanted: Option<HashSet<SpwId>> = spw_ids.map(|ids| ids.iter().copied().collect());
        let edges: Vec<(f64, f64)> = ref_freqs
            .into_iter()
            .zip(total_bandwidths)
            .enumerate()
            .filter(|(spw, _)| wanted.as_ref().map_or(true, |w| w.contains(spw)))
            .map(|(_, (ref_freq, bandwidth))| {
                (ref_freq - bandwidth / 2.0, ref_freq + bandwidth / 2.0)
            })
            .collect();
        trace!("Coverage of {} SPWs", edges.len());

        Ok(Array2::from_shape_fn((edges.len(), 2), |(i, j)| {
            if j == 0 {
                edges[i].0
            } else {
                edges[i].1
            }
        }))
    }
}
