use crate::config::*;

/// The separator between the blanks of a multi-blank answer.
pub const BLANK_SEPARATOR: char = ',';
/// How the export writes a comma that belongs to a blank.
pub const ESCAPED_SEPARATOR: &str = "\\,";

/// Decodes the raw cell of one question.
///
/// An empty cell is the absence of an answer.
pub fn decode(raw: &str, question: &Question) -> QuizResponse {
    if raw.is_empty() {
        QuizResponse::absent(question.question_type)
    } else {
        decode_answer(raw, question)
    }
}

/// Decodes a cell that is known to hold an answer, even an empty one.
pub fn decode_answer(raw: &str, question: &Question) -> QuizResponse {
    match question.question_type {
        QuestionType::Essay => QuizResponse::Essay(Some(raw.to_string())),
        QuestionType::FillInTheBlank => QuizResponse::FillInTheBlank(Some(split_blanks(raw))),
        QuestionType::Other => QuizResponse::Other(Some(raw.to_string())),
    }
}

/// Splits a multi-blank answer into its blanks.
///
/// Works in two passes: the escaped commas are first replaced by a sentinel
/// character, the result is split on the remaining commas, and the sentinel is
/// turned back into a comma inside each blank. The sentinel is picked among
/// characters that do not occur in the answer, so it cannot be confused with the
/// content.
pub fn split_blanks(raw: &str) -> Vec<String> {
    let sentinel = match pick_sentinel(raw) {
        Some(c) => c,
        None => return split_blanks_scanning(raw),
    };
    let mut buf = [0u8; 4];
    let sentinel_str: &str = sentinel.encode_utf8(&mut buf);
    raw.replace(ESCAPED_SEPARATOR, sentinel_str)
        .split(BLANK_SEPARATOR)
        .map(|blank| blank.replace(sentinel, ","))
        .collect()
}

// Newline first, then the private use area.
fn pick_sentinel(raw: &str) -> Option<char> {
    std::iter::once('\n')
        .chain((0xE000..=0xF8FF).filter_map(char::from_u32))
        .find(|c| !raw.contains(*c))
}

// Single pass over the characters. Only used when no sentinel is available.
fn split_blanks_scanning(raw: &str) -> Vec<String> {
    let mut blanks: Vec<String> = vec![String::new()];
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&BLANK_SEPARATOR) {
            chars.next();
            if let Some(last) = blanks.last_mut() {
                last.push(BLANK_SEPARATOR);
            }
        } else if c == BLANK_SEPARATOR {
            blanks.push(String::new());
        } else if let Some(last) = blanks.last_mut() {
            last.push(c);
        }
    }
    blanks
}
