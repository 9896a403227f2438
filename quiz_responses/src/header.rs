//! Resolution of the export layout from its header row.
//!
//! The export has a variable number of columns around the questions, so the
//! boundaries are found with sentinel column names instead of fixed offsets.

use log::debug;
use snafu::{ensure, OptionExt};

use crate::config::*;

/// The column holding the student identifier.
pub const ID_COLUMN: &str = "id";
/// The question block starts right after this column, or after `ATTEMPT_COLUMN`,
/// whichever comes last.
pub const SUBMITTED_COLUMN: &str = "submitted";
pub const ATTEMPT_COLUMN: &str = "attempt";
/// First column after the question block.
pub const N_CORRECT_COLUMN: &str = "n correct";

fn last_position(header: &[String], token: &str) -> Option<usize> {
    header.iter().rposition(|cell| cell == token)
}

/// The question identifier encoded in a block header cell (`"<id>: <text>"`).
pub fn question_id(cell: &str) -> &str {
    cell.split_once(':').map(|(id, _)| id).unwrap_or(cell)
}

/// Finds the identifier column and the question block in the header row.
///
/// Duplicated sentinels are resolved by taking the last occurrence.
pub fn locate_columns(header: &[String]) -> ConversionResult<ColumnMap> {
    let id_column = last_position(header, ID_COLUMN).context(MissingSentinelSnafu {
        token: format!("{:?}", ID_COLUMN),
    })?;

    let attempt_column = last_position(header, ATTEMPT_COLUMN);
    // None < Some(_): the greatest index that was found wins.
    let block_start = last_position(header, SUBMITTED_COLUMN)
        .max(attempt_column)
        .context(MissingSentinelSnafu {
            token: format!("{:?} or {:?}", SUBMITTED_COLUMN, ATTEMPT_COLUMN),
        })?
        + 1;

    let block_stop = last_position(header, N_CORRECT_COLUMN).context(MissingSentinelSnafu {
        token: format!("{:?}", N_CORRECT_COLUMN),
    })?;

    ensure!(
        block_start <= block_stop,
        InvertedBlockSnafu {
            start: block_start,
            stop: block_stop
        }
    );
    ensure!(
        (block_stop - block_start) % 2 == 0,
        OddBlockWidthSnafu {
            start: block_start,
            stop: block_stop
        }
    );

    let question_ids: Vec<String> = header[block_start..block_stop]
        .iter()
        .step_by(2)
        .map(|cell| question_id(cell).to_string())
        .collect();

    debug!(
        "locate_columns: id: {} attempt: {:?} block: [{}, {}) questions: {:?}",
        id_column, attempt_column, block_start, block_stop, question_ids
    );

    Ok(ColumnMap {
        id_column,
        attempt_column,
        block_start,
        block_stop,
        question_ids,
    })
}
