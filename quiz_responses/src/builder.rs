use log::debug;
use std::collections::HashMap;

pub use crate::config::*;
use crate::decode::decode_answer;

/// Builds the student records out of the submission rows.
///
/// ```
/// use quiz_responses::builder::RecordBuilder;
/// use quiz_responses::header::locate_columns;
/// use quiz_responses::{Question, QuestionType, QuizResponse, RosterEntry};
///
/// let header: Vec<String> = ["id", "attempt", "7: Name a colour", "1.0", "n correct"]
///     .iter().map(|s| s.to_string()).collect();
/// let column_map = locate_columns(&header)?;
/// let questions = vec![Question {
///     id: "7".to_string(),
///     question_type: QuestionType::Essay,
///     name: "Question 1".to_string(),
///     prompt: "Name a colour".to_string(),
///     points: 1.0,
///     position: 1,
/// }];
/// let roster = vec![RosterEntry {
///     id: "12".to_string(),
///     login: "ada".to_string(),
///     email: "ada@example.edu".to_string(),
///     name: "Ada".to_string(),
///     secondary_id: "900001".to_string(),
/// }];
///
/// let builder = RecordBuilder::new(&column_map, &questions, &roster);
/// let row: Vec<String> = ["12", "1", "blue", "1.0", "1"].iter().map(|s| s.to_string()).collect();
/// let record = builder.build(&row).unwrap();
/// assert_eq!(record.login, "ada");
/// assert_eq!(record.responses, vec![QuizResponse::Essay(Some("blue".to_string()))]);
///
/// # Ok::<(), quiz_responses::ConversionError>(())
/// ```
pub struct RecordBuilder<'a> {
    column_map: &'a ColumnMap,
    questions: &'a [Question],
    roster_by_id: HashMap<&'a str, &'a RosterEntry>,
}

impl<'a> RecordBuilder<'a> {
    /// `questions` must be in block order: the k-th question is the k-th column
    /// pair of the block.
    pub fn new(
        column_map: &'a ColumnMap,
        questions: &'a [Question],
        roster: &'a [RosterEntry],
    ) -> RecordBuilder<'a> {
        let mut roster_by_id: HashMap<&'a str, &'a RosterEntry> = HashMap::new();
        for entry in roster.iter() {
            roster_by_id.entry(entry.id.as_str()).or_insert(entry);
        }
        RecordBuilder {
            column_map,
            questions,
            roster_by_id,
        }
    }

    /// The roster entry a row belongs to, if any.
    pub fn roster_entry(&self, row: &[String]) -> Option<&'a RosterEntry> {
        let id = cell(row, self.column_map.id_column());
        self.roster_by_id.get(id).copied()
    }

    /// Builds the record of one row.
    ///
    /// Rows that do not belong to anyone in the roster (test students, previews)
    /// are dropped.
    pub fn build(&self, row: &[String]) -> Option<StudentRecord> {
        let entry = match self.roster_entry(row) {
            Some(e) => e,
            None => {
                debug!(
                    "build: dropping row with id {:?}: not in the roster",
                    cell(row, self.column_map.id_column())
                );
                return None;
            }
        };

        let responses: Vec<QuizResponse> = self
            .questions
            .iter()
            .enumerate()
            .map(|(k, question)| {
                // The score column is only filled when the question was answered.
                if cell(row, self.column_map.marker_column(k)).is_empty() {
                    QuizResponse::absent(question.question_type)
                } else {
                    decode_answer(cell(row, self.column_map.answer_column(k)), question)
                }
            })
            .collect();

        let attempt = self
            .column_map
            .attempt_column()
            .and_then(|idx| cell(row, idx).trim().parse::<u32>().ok())
            .filter(|a| *a > 0)
            .unwrap_or(1);

        debug!(
            "build: row for {:?} attempt {}: {} answered out of {}",
            entry.login,
            attempt,
            responses.iter().filter(|r| r.is_answered()).count(),
            responses.len()
        );

        Some(StudentRecord {
            id: entry.id.clone(),
            login: entry.login.clone(),
            email: entry.email.clone(),
            name: entry.name.clone(),
            secondary_id: entry.secondary_id.clone(),
            attempt,
            responses,
        })
    }
}

/// Builds the record of a single row. See `RecordBuilder` to process many rows.
pub fn build_record(
    row: &[String],
    column_map: &ColumnMap,
    questions: &[Question],
    roster: &[RosterEntry],
) -> Option<StudentRecord> {
    RecordBuilder::new(column_map, questions, roster).build(row)
}
