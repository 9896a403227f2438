use crate::quiz::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

/// A question, as returned by the questions endpoint of the learning platform.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQuestion {
    pub id: JSValue,
    pub question_type: Option<QuestionType>,
    pub question_name: Option<String>,
    pub question_text: Option<String>,
    pub points_possible: Option<f64>,
    pub position: Option<u32>,
}

impl CatalogQuestion {
    pub fn to_question(&self, path: &str) -> QuizResult<Question> {
        let id = read_js_id(&self.id).context(ParsingJsonIdSnafu {
            path,
            content: self.id.to_string(),
        })?;
        Ok(Question {
            id,
            question_type: self.question_type.unwrap_or(QuestionType::Other),
            name: self.question_name.clone().unwrap_or_default(),
            prompt: self.question_text.clone().unwrap_or_default(),
            points: self.points_possible.unwrap_or(0.0),
            // Unpositioned questions come first.
            position: self.position.unwrap_or(0),
        })
    }
}

/// A student, as returned by the users endpoint of the learning platform.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStudent {
    pub id: JSValue,
    pub name: Option<String>,
    pub login_id: Option<String>,
    pub email: Option<String>,
    pub sis_user_id: Option<JSValue>,
}

impl CatalogStudent {
    pub fn to_roster_entry(&self, path: &str) -> QuizResult<RosterEntry> {
        let id = read_js_id(&self.id).context(ParsingJsonIdSnafu {
            path,
            content: self.id.to_string(),
        })?;
        Ok(RosterEntry {
            id,
            login: self.login_id.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            secondary_id: self
                .sis_user_id
                .as_ref()
                .and_then(read_js_id)
                .unwrap_or_default(),
        })
    }
}

// Identifiers are numbers in the platform API, and strings in the reports.
fn read_js_id(x: &JSValue) -> Option<String> {
    match x {
        JSValue::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        JSValue::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> QuizResult<T> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn read_questions(path: &str) -> BQuizResult<Vec<Question>> {
    let catalog: Vec<CatalogQuestion> = read_json(path)?;
    let mut res: Vec<Question> = Vec::new();
    for cq in catalog.iter() {
        res.push(cq.to_question(path)?);
    }
    debug!("read_questions: {:?}", res);
    Ok(res)
}

pub fn read_roster(path: &str) -> BQuizResult<Vec<RosterEntry>> {
    let students: Vec<CatalogStudent> = read_json(path)?;
    let mut res: Vec<RosterEntry> = Vec::new();
    for cs in students.iter() {
        res.push(cs.to_roster_entry(path)?);
    }
    debug!("read_roster: {} entries", res.len());
    Ok(res)
}

pub fn read_reference(path: &str) -> QuizResult<JSValue> {
    read_json(path)
}
