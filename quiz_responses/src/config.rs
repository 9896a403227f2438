// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// The kinds of questions the decoder distinguishes.
///
/// The names follow the question types of the external catalog. Everything that is
/// not an essay or a multi-blank question is treated opaquely.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "essay_question")]
    Essay,
    #[serde(rename = "fill_in_multiple_blanks_question")]
    FillInTheBlank,
    #[serde(rename = "other")]
    #[serde(other)]
    Other,
}

/// A question, as provided by the question catalog.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub name: String,
    pub prompt: String,
    pub points: f64,
    /// The position assigned by the catalog. Several questions may share a position.
    pub position: u32,
}

/// One enrolled person. The roster is the authority for all the display fields.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub login: String,
    pub email: String,
    pub name: String,
    /// Institutional identifier
    pub secondary_id: String,
}

/// The parsed cells of an export. The first row is the header.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> RawTable {
        RawTable { rows }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(|r| r.as_slice())
    }

    /// All the submission rows (everything after the header).
    pub fn records(&self) -> &[Vec<String>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }
}

/// The cell of a row at a column. Rows may be shorter than the header: missing
/// cells read as empty.
pub fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|s| s.as_str()).unwrap_or("")
}

/// Where the data lives in the export, as resolved from the header row.
///
/// Invariant: the question block `[block_start, block_stop)` has an even width, one
/// (answer, score marker) pair of columns per question.
/// It can only be built by `header::locate_columns`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnMap {
    pub(crate) id_column: usize,
    pub(crate) attempt_column: Option<usize>,
    pub(crate) block_start: usize,
    pub(crate) block_stop: usize,
    pub(crate) question_ids: Vec<String>,
}

impl ColumnMap {
    pub fn id_column(&self) -> usize {
        self.id_column
    }

    pub fn attempt_column(&self) -> Option<usize> {
        self.attempt_column
    }

    pub fn block_start(&self) -> usize {
        self.block_start
    }

    pub fn block_stop(&self) -> usize {
        self.block_stop
    }

    /// The question identifiers, in block order.
    pub fn question_ids(&self) -> &[String] {
        &self.question_ids
    }

    pub fn num_questions(&self) -> usize {
        self.question_ids.len()
    }

    /// The column holding the answer to the k-th question of the block.
    pub fn answer_column(&self, k: usize) -> usize {
        self.block_start + 2 * k
    }

    /// The column holding the score of the k-th question. It is empty when the
    /// question was not answered.
    pub fn marker_column(&self, k: usize) -> usize {
        self.block_start + 2 * k + 1
    }
}

// ******** Output data structures *********

/// The answer of one student to one question.
///
/// The response is `None` if and only if the student did not answer the question.
/// An empty string is still an answer.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "response", rename_all = "snake_case")]
pub enum QuizResponse {
    Essay(Option<String>),
    /// One string per blank, in order.
    FillInTheBlank(Option<Vec<String>>),
    Other(Option<String>),
}

impl QuizResponse {
    /// The response of a student who did not answer a question of this type.
    pub fn absent(question_type: QuestionType) -> QuizResponse {
        match question_type {
            QuestionType::Essay => QuizResponse::Essay(None),
            QuestionType::FillInTheBlank => QuizResponse::FillInTheBlank(None),
            QuestionType::Other => QuizResponse::Other(None),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            QuizResponse::Essay(_) => QuestionType::Essay,
            QuizResponse::FillInTheBlank(_) => QuestionType::FillInTheBlank,
            QuizResponse::Other(_) => QuestionType::Other,
        }
    }

    pub fn is_answered(&self) -> bool {
        match self {
            QuizResponse::Essay(r) => r.is_some(),
            QuizResponse::FillInTheBlank(r) => r.is_some(),
            QuizResponse::Other(r) => r.is_some(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub login: String,
    pub email: String,
    pub name: String,
    pub secondary_id: String,
    /// The attempt number of the parsed submission. 0 when the student did not submit.
    pub attempt: u32,
    /// One response per question, in the order of `Conversion::questions`.
    pub responses: Vec<QuizResponse>,
}

impl StudentRecord {
    pub const TEMPLATE_ID: &'static str = "-1";
    const TEMPLATE_BLANK: &'static str = "_______________";

    /// A record for a roster entry without any submission.
    pub fn blank(entry: &RosterEntry, questions: &[Question]) -> StudentRecord {
        StudentRecord {
            id: entry.id.clone(),
            login: entry.login.clone(),
            email: entry.email.clone(),
            name: entry.name.clone(),
            secondary_id: entry.secondary_id.clone(),
            attempt: 0,
            responses: absent_responses(questions),
        }
    }

    /// The blank answer sheet.
    pub fn template(questions: &[Question]) -> StudentRecord {
        StudentRecord {
            id: StudentRecord::TEMPLATE_ID.to_string(),
            login: StudentRecord::TEMPLATE_BLANK.to_string(),
            email: "null".to_string(),
            name: StudentRecord::TEMPLATE_BLANK.to_string(),
            secondary_id: StudentRecord::TEMPLATE_BLANK.to_string(),
            attempt: 0,
            responses: absent_responses(questions),
        }
    }

    pub fn has_submission(&self) -> bool {
        self.attempt > 0
    }
}

fn absent_responses(questions: &[Question]) -> Vec<QuizResponse> {
    questions
        .iter()
        .map(|q| QuizResponse::absent(q.question_type))
        .collect()
}

/// The complete result of a conversion.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    /// The questions, in display order.
    pub questions: Vec<Question>,
    pub template: StudentRecord,
    /// Exactly one record per roster entry, in roster order.
    pub students: Vec<StudentRecord>,
}

impl Conversion {
    /// The template followed by all the students.
    pub fn records(&self) -> impl Iterator<Item = &StudentRecord> {
        std::iter::once(&self.template).chain(self.students.iter())
    }
}

/// Errors that prevent the conversion from completing.
///
/// All of them mean that the export does not have the expected shape. No partial
/// result is ever returned.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConversionError {
    #[snafu(display("The export is empty: no header row"))]
    EmptyTable {},

    #[snafu(display("The export header has no {token:?} column"))]
    MissingSentinel { token: String },

    #[snafu(display("The question block ends (column {stop}) before it starts (column {start})"))]
    InvertedBlock { start: usize, stop: usize },

    #[snafu(display(
        "The question block [{start}, {stop}) has an odd number of columns"
    ))]
    OddBlockWidth { start: usize, stop: usize },

    #[snafu(display("Question {question_id} of the export is not in the question catalog"))]
    UnknownQuestion { question_id: String },

    #[snafu(display("Failed to parse the CSV export"))]
    CsvParse { source: csv::Error },
}

pub type ConversionResult<T> = Result<T, ConversionError>;
