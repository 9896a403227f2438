// Reading of the CSV reports.

use crate::quiz::*;

pub fn read_csv_report(path: &str) -> BQuizResult<RawTable> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let table = read_table(&contents).context(ConvertingSnafu { path })?;
    debug!(
        "read_csv_report: header: {:?}, {} submission rows",
        table.header(),
        table.records().len()
    );
    Ok(table)
}
