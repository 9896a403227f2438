use std::collections::{HashMap, HashSet};

use quiz_responses::header::locate_columns;

use crate::quiz::*;

/// Which submission to keep for a student who took the quiz several times.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AttemptStrategy {
    First,
    Last,
}

impl AttemptStrategy {
    pub fn parse(strategy: &Option<String>) -> QuizResult<AttemptStrategy> {
        match strategy.as_deref() {
            None | Some("last") => Ok(AttemptStrategy::Last),
            Some("first") => Ok(AttemptStrategy::First),
            Some("all") => {
                whatever!("Attempt strategy 'all' is not supported: there is one record per student")
            }
            Some(x) => whatever!("Unknown attempt strategy {:?}", x),
        }
    }

    // On equal attempt numbers, 'last' takes the later row.
    fn prefers(&self, attempt: u32, best: u32) -> bool {
        match self {
            AttemptStrategy::First => attempt < best,
            AttemptStrategy::Last => attempt >= best,
        }
    }
}

/// Keeps one row per student, according to the strategy.
///
/// The rows keep their order. Reports without an attempt column are returned as is.
pub fn select_attempts(
    table: &RawTable,
    strategy: AttemptStrategy,
) -> ConversionResult<RawTable> {
    let header = match table.header() {
        Some(h) => h,
        // Let the conversion report it.
        None => return Ok(table.clone()),
    };
    let column_map = locate_columns(header)?;
    let attempt_column = match column_map.attempt_column() {
        Some(c) => c,
        None => {
            debug!("select_attempts: no attempt column, keeping all the rows");
            return Ok(table.clone());
        }
    };

    // Student id -> (attempt, row index)
    let mut chosen: HashMap<&str, (u32, usize)> = HashMap::new();
    for (idx, row) in table.records().iter().enumerate() {
        let id = cell(row, column_map.id_column());
        let attempt = cell(row, attempt_column)
            .trim()
            .parse::<u32>()
            .unwrap_or(0);
        match chosen.get(id) {
            Some((best, _)) if !strategy.prefers(attempt, *best) => {}
            _ => {
                chosen.insert(id, (attempt, idx));
            }
        }
    }

    let keep: HashSet<usize> = chosen.values().map(|(_, idx)| *idx).collect();
    let num_dropped = table.records().len() - keep.len();
    if num_dropped > 0 {
        info!(
            "select_attempts: {:?} strategy, dropping {} rows of earlier or later attempts",
            strategy, num_dropped
        );
    }

    let mut rows: Vec<Vec<String>> = vec![header.to_vec()];
    rows.extend(
        table
            .records()
            .iter()
            .enumerate()
            .filter(|(idx, _)| keep.contains(idx))
            .map(|(_, row)| row.clone()),
    );
    Ok(RawTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn answers(t: &RawTable) -> Vec<&str> {
        t.records().iter().map(|r| r[2].as_str()).collect()
    }

    fn report() -> RawTable {
        table(&[
            &["id", "attempt", "1: q", "1", "n correct"],
            &["10", "2", "second", "1", "1"],
            &["11", "1", "only", "1", "1"],
            &["10", "1", "first", "1", "1"],
            &["10", "3", "third", "1", "1"],
        ])
    }

    #[test]
    fn last_attempt() {
        let t = select_attempts(&report(), AttemptStrategy::Last).unwrap();
        assert_eq!(answers(&t), vec!["only", "third"]);
        assert_eq!(t.header(), report().header());
    }

    #[test]
    fn first_attempt() {
        let t = select_attempts(&report(), AttemptStrategy::First).unwrap();
        assert_eq!(answers(&t), vec!["only", "first"]);
    }

    #[test]
    fn without_attempt_column() {
        let t = table(&[
            &["id", "submitted", "1: q", "1", "n correct"],
            &["10", "yes", "a", "1", "1"],
            &["10", "yes", "b", "1", "1"],
        ]);
        assert_eq!(select_attempts(&t, AttemptStrategy::Last).unwrap(), t);
    }

    #[test]
    fn short_rows() {
        let t = table(&[
            &["id", "attempt", "1: q", "1", "n correct"],
            &["10", "2", "second", "1", "1"],
            &["10"],
            &[],
        ]);
        // Missing cells read as empty: no attempt number, no student id.
        let last = select_attempts(&t, AttemptStrategy::Last).unwrap();
        assert_eq!(last.records().len(), 2);
        assert_eq!(last.records()[0][2], "second");
        assert!(last.records()[1].is_empty());
        let first = select_attempts(&t, AttemptStrategy::First).unwrap();
        assert_eq!(first.records().len(), 2);
        assert_eq!(first.records()[0], vec!["10".to_string()]);
    }

    #[test]
    fn strategies() {
        assert_eq!(AttemptStrategy::parse(&None).unwrap(), AttemptStrategy::Last);
        assert_eq!(
            AttemptStrategy::parse(&Some("first".to_string())).unwrap(),
            AttemptStrategy::First
        );
        assert!(AttemptStrategy::parse(&Some("all".to_string())).is_err());
        assert!(AttemptStrategy::parse(&Some("best".to_string())).is_err());
    }
}
