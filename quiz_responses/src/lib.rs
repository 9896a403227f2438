mod config;
pub mod builder;
pub mod decode;
pub mod header;
pub mod manual;

use log::{debug, info, warn};
use snafu::{OptionExt, ResultExt};

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

pub use crate::config::*;
use crate::builder::RecordBuilder;
use crate::header::locate_columns;

/// The question catalog.
///
/// Fetching is the business of the implementor: by the time the conversion asks
/// for a question, the answer must be available.
pub trait QuestionSource {
    /// Returns `None` if the catalog does not know this question.
    fn fetch_question(&self, question_id: &str) -> Option<Question>;
}

impl QuestionSource for [Question] {
    fn fetch_question(&self, question_id: &str) -> Option<Question> {
        self.iter().find(|q| q.id == question_id).cloned()
    }
}

impl QuestionSource for Vec<Question> {
    fn fetch_question(&self, question_id: &str) -> Option<Question> {
        self.as_slice().fetch_question(question_id)
    }
}

impl QuestionSource for HashMap<String, Question> {
    fn fetch_question(&self, question_id: &str) -> Option<Question> {
        self.get(question_id).cloned()
    }
}

// ******** Ordering ********

/// The display order of the questions: by position, then by numeric identifier.
///
/// Identifiers that are not numbers come after the numeric ones and are compared
/// as strings, so that the order is total.
pub fn compare_questions(q1: &Question, q2: &Question) -> Ordering {
    q1.position
        .cmp(&q2.position)
        .then_with(|| compare_ids(&q1.id, &q2.id))
}

fn compare_ids(id1: &str, id2: &str) -> Ordering {
    match (id1.trim().parse::<i64>(), id2.trim().parse::<i64>()) {
        (Ok(x1), Ok(x2)) => x1.cmp(&x2).then_with(|| id1.cmp(id2)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => id1.cmp(id2),
    }
}

/// Sorts the questions in display order.
pub fn sort_questions(questions: &mut [Question]) {
    questions.sort_by(compare_questions);
}

/// The permutation that puts the questions in display order: the i-th question to
/// display is `questions[question_order(questions)[i]]`.
pub fn question_order(questions: &[Question]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..questions.len()).collect();
    order.sort_by(|i1, i2| compare_questions(&questions[*i1], &questions[*i2]));
    order
}

fn reorder<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|idx| items[*idx].clone()).collect()
}

// ******** Roster merge ********

/// Completes the parsed records with the rest of the roster.
///
/// Every roster entry gets exactly one record, in roster order: its parsed record if
/// there is one, or a record without any answer. The records must already follow
/// the order of `questions`.
pub fn merge_roster(
    questions: &[Question],
    roster: &[RosterEntry],
    built: Vec<StudentRecord>,
) -> Conversion {
    let mut built_by_id: HashMap<String, StudentRecord> = HashMap::new();
    for record in built {
        if built_by_id.contains_key(&record.id) {
            warn!(
                "merge_roster: several records for student {:?} ({}), keeping the first one",
                record.login, record.id
            );
        } else {
            built_by_id.insert(record.id.clone(), record);
        }
    }

    let mut num_synthesized = 0;
    let students: Vec<StudentRecord> = roster
        .iter()
        .map(|entry| match built_by_id.get(&entry.id) {
            Some(record) => record.clone(),
            None => {
                debug!(
                    "merge_roster: no submission for {:?} ({})",
                    entry.login, entry.id
                );
                num_synthesized += 1;
                StudentRecord::blank(entry, questions)
            }
        })
        .collect();

    info!(
        "merge_roster: {} students, {} without a submission",
        students.len(),
        num_synthesized
    );

    Conversion {
        questions: questions.to_vec(),
        template: StudentRecord::template(questions),
        students,
    }
}

// ******** Conversion ********

/// Converts a parsed export into one record per roster entry.
///
/// Arguments:
/// * `table` the cells of the export, header first
/// * `roster` the students to include, in the order of the output
/// * `source` the question catalog, queried once per question of the export
pub fn convert<S: QuestionSource + ?Sized>(
    table: &RawTable,
    roster: &[RosterEntry],
    source: &S,
) -> ConversionResult<Conversion> {
    let header = table.header().context(EmptyTableSnafu {})?;
    let column_map = locate_columns(header)?;

    let mut block_questions: Vec<Question> = Vec::with_capacity(column_map.num_questions());
    for question_id in column_map.question_ids() {
        let q = source
            .fetch_question(question_id)
            .context(UnknownQuestionSnafu {
                question_id: question_id.clone(),
            })?;
        block_questions.push(q);
    }

    let order = question_order(&block_questions);
    debug!("convert: display order of the block: {:?}", order);

    info!(
        "convert: {} submission rows, {} questions, {} students",
        table.records().len(),
        block_questions.len(),
        roster.len()
    );

    let builder = RecordBuilder::new(&column_map, &block_questions, roster);
    let mut built: Vec<StudentRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut num_dropped = 0;
    for row in table.records() {
        match builder.build(row) {
            Some(record) if seen.contains(&record.id) => {
                warn!(
                    "convert: another row for student {:?} ({}), keeping the first one",
                    record.login, record.id
                );
            }
            Some(mut record) => {
                record.responses = reorder(&record.responses, &order);
                seen.insert(record.id.clone());
                built.push(record);
            }
            None => {
                num_dropped += 1;
            }
        }
    }
    if num_dropped > 0 {
        info!(
            "convert: {} rows did not match anyone in the roster",
            num_dropped
        );
    }

    let questions = reorder(&block_questions, &order);
    Ok(merge_roster(&questions, roster, built))
}

/// Parses the CSV text of an export. A leading byte order mark is dropped.
pub fn read_table(csv_text: &str) -> ConversionResult<RawTable> {
    let text = csv_text.strip_prefix('\u{feff}').unwrap_or(csv_text);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record.context(CsvParseSnafu {})?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(RawTable::new(rows))
}

/// Parses the CSV text of an export and converts it. See `convert`.
pub fn parse_responses<S: QuestionSource + ?Sized>(
    csv_text: &str,
    roster: &[RosterEntry],
    source: &S,
) -> ConversionResult<Conversion> {
    let table = read_table(csv_text)?;
    convert(&table, roster, source)
}
