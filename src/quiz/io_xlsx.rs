// Reading of the reports that were saved as Excel spreadsheets.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::quiz::*;

pub fn read_xlsx_report(path: &str, worksheet_name: &Option<String>) -> BQuizResult<RawTable> {
    let wrange = get_range(path, worksheet_name)?;
    let rows: Vec<Vec<String>> = wrange
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    let table = RawTable::new(rows);
    debug!(
        "read_xlsx_report: header: {:?}, {} submission rows",
        table.header(),
        table.records().len()
    );
    Ok(table)
}

// Spreadsheets turn the numeric columns (ids, scores) into numbers.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        DataType::DateTime(f) => f.to_string(),
        _ => format!("{:?}", cell),
    }
}

fn get_range(path: &str, worksheet_name: &Option<String>) -> BQuizResult<calamine::Range<DataType>> {
    debug!(
        "read_xlsx_report: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(QuizError::EmptyExcel {
                path: path.to_string(),
            })),
            [(name, wrange)] => {
                debug!("read_xlsx_report: using worksheet {:?}", name);
                Ok(wrange.clone())
            }
            _ => Err(Box::new(QuizError::AmbiguousWorksheet {
                path: path.to_string(),
            })),
        }
    }
}
