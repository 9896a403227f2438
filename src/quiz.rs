use log::{debug, info, warn};

use quiz_responses::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::Serialize;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::quiz::attempts::{select_attempts, AttemptStrategy};
use crate::quiz::config_reader::*;

mod attempts;
mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum QuizError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display(
        "The spreadsheet {path} has several worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("The spreadsheet {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error building the JSON output"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Invalid identifier in {path}: {content}"))]
    ParsingJsonId { path: String, content: String },
    #[snafu(display("Could not convert the report {path}"))]
    Converting {
        source: ConversionError,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type QuizResult<T> = Result<T, QuizError>;
pub type BQuizResult<T> = Result<T, Box<QuizError>>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    fn parse(input_type: &Option<String>) -> QuizResult<InputType> {
        match input_type.as_deref() {
            None | Some("csv") => Ok(InputType::Csv),
            Some("xlsx") | Some("excel") => Ok(InputType::Xlsx),
            Some(x) => whatever!("Input type not implemented {:?}", x),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum TemplateMode {
    Include,
    Only,
    Exclude,
}

impl TemplateMode {
    fn parse(template: &Option<String>) -> QuizResult<TemplateMode> {
        match template.as_deref() {
            None | Some("include") => Ok(TemplateMode::Include),
            Some("only") => Ok(TemplateMode::Only),
            Some("exclude") => Ok(TemplateMode::Exclude),
            Some(x) => whatever!(
                "Unknown template mode {:?}: expected 'include', 'only' or 'exclude'",
                x
            ),
        }
    }
}

/// What gets written out.
#[derive(Serialize, Debug)]
struct ConversionOutput<'a> {
    questions: &'a [Question],
    template: Option<&'a StudentRecord>,
    students: Vec<&'a StudentRecord>,
}

fn read_report(args: &Args) -> BQuizResult<RawTable> {
    info!("Attempting to read report file {:?}", args.input);
    match InputType::parse(&args.input_type)? {
        InputType::Csv => io_csv::read_csv_report(&args.input),
        InputType::Xlsx => io_xlsx::read_xlsx_report(&args.input, &args.excel_worksheet_name),
    }
}

/// Restricts the roster to the given logins (all of it if there are none) and
/// sorts it by login.
fn filter_roster(
    roster: Vec<RosterEntry>,
    logins: &[String],
    strict: bool,
) -> QuizResult<Vec<RosterEntry>> {
    let mut students: Vec<RosterEntry> = roster
        .into_iter()
        .filter(|s| logins.is_empty() || logins.contains(&s.login))
        .collect();
    students.sort_by(|s1, s2| s1.login.cmp(&s2.login));

    if !logins.is_empty() && students.len() != logins.len() {
        let missing: Vec<&str> = logins
            .iter()
            .filter(|l| !students.iter().any(|s| &s.login == *l))
            .map(|l| l.as_str())
            .collect();
        warn!(
            "Number of students to be processed ({}) is not the same as the filter ({}). Not in the roster: {:?}",
            students.len(),
            logins.len(),
            missing
        );
        if strict {
            whatever!(
                "Students in the filter are not in the roster: {}",
                missing.join(", ")
            )
        }
    }
    Ok(students)
}

/// Runs the whole conversion and returns the JSON output.
pub fn convert_files(args: &Args) -> BQuizResult<JSValue> {
    let template_mode = TemplateMode::parse(&args.template)?;
    let attempt_strategy = AttemptStrategy::parse(&args.attempt_strategy)?;

    let table = read_report(args)?;
    let questions = read_questions(&args.questions)?;
    let roster = read_roster(&args.roster)?;
    info!(
        "Read {} questions and {} roster entries",
        questions.len(),
        roster.len()
    );

    let logins = io_common::read_student_filter(&args.students)?;
    let roster = filter_roster(roster, &logins, args.strict)?;

    let table = select_attempts(&table, attempt_strategy).context(ConvertingSnafu {
        path: args.input.clone(),
    })?;
    let conversion = convert(&table, &roster, &questions).context(ConvertingSnafu {
        path: args.input.clone(),
    })?;

    let students: Vec<&StudentRecord> = match template_mode {
        TemplateMode::Only => Vec::new(),
        _ => conversion
            .students
            .iter()
            .filter(|s| args.include_no_sub || s.has_submission())
            .collect(),
    };
    debug!(
        "convert_files: writing {} students out of {}",
        students.len(),
        conversion.students.len()
    );
    let output = ConversionOutput {
        questions: &conversion.questions,
        template: match template_mode {
            TemplateMode::Exclude => None,
            _ => Some(&conversion.template),
        },
        students,
    };
    let js = serde_json::to_value(&output).context(WritingJsonSnafu {})?;
    Ok(js)
}

fn write_output(out: &Option<String>, pretty_js: &str) -> BQuizResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, pretty_js).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> QuizResult<()> {
    let reference = read_reference(reference_path)?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(WritingJsonSnafu {})?;
    if pretty_reference != pretty_js {
        warn!("Found differences with the reference file {:?}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_js, "\n");
        whatever!("Difference detected between the output and the reference")
    }
    info!("The output matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_conversion(args: &Args) -> BQuizResult<()> {
    let js = convert_files(args)?;
    let pretty_js = serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})?;
    write_output(&args.out, &pretty_js)?;
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_args(test_name: &str) -> Args {
        let test_dir = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), test_name);
        Args {
            input: format!("{}/export.csv", test_dir),
            input_type: None,
            excel_worksheet_name: None,
            questions: format!("{}/questions.json", test_dir),
            roster: format!("{}/roster.json", test_dir),
            out: None,
            reference: Some(format!("{}/expected.json", test_dir)),
            students: None,
            attempt_strategy: None,
            template: None,
            include_no_sub: false,
            strict: false,
            verbose: false,
        }
    }

    fn test_wrapper(test_name: &str) {
        init_logs();
        let res = run_conversion(&test_args(test_name));
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }

    fn logins(js: &JSValue) -> Vec<String> {
        js["students"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["login"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn basic() {
        test_wrapper("basic");
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        init_logs();
        let mut args = test_args("basic");
        args.include_no_sub = true;
        assert!(run_conversion(&args).is_err());
    }

    #[test]
    fn include_students_without_submission() {
        init_logs();
        let mut args = test_args("basic");
        args.include_no_sub = true;
        let js = convert_files(&args).unwrap();
        assert_eq!(logins(&js), vec!["alovelace3", "cbabbage", "ghopper"]);
        let grace = &js["students"][2];
        assert_eq!(grace["attempt"], 0);
        assert_eq!(grace["email"], "");
        assert_eq!(grace["secondary_id"], "900003");
    }

    #[test]
    fn first_attempt() {
        init_logs();
        let mut args = test_args("basic");
        args.attempt_strategy = Some("first".to_string());
        let js = convert_files(&args).unwrap();
        let ada = &js["students"][0];
        assert_eq!(ada["attempt"], 1);
        // Display order: 202, 203, 201
        assert_eq!(ada["responses"][0]["response"], "Blue");
        assert_eq!(
            ada["responses"][1]["response"],
            serde_json::json!(["left,right", "up"])
        );
        assert_eq!(ada["responses"][2]["response"], "It calls itself.");
    }

    #[test]
    fn template_modes() {
        init_logs();
        let mut args = test_args("basic");
        args.template = Some("only".to_string());
        let js = convert_files(&args).unwrap();
        assert!(logins(&js).is_empty());
        assert_eq!(js["template"]["id"], "-1");

        args.template = Some("exclude".to_string());
        let js = convert_files(&args).unwrap();
        assert!(js["template"].is_null());
        assert_eq!(logins(&js).len(), 2);

        args.template = Some("sometimes".to_string());
        assert!(convert_files(&args).is_err());
    }

    #[test]
    fn student_filter() {
        init_logs();
        let mut args = test_args("basic");
        args.students = Some(vec!["cbabbage".to_string(), "nobody".to_string()]);
        let js = convert_files(&args).unwrap();
        assert_eq!(logins(&js), vec!["cbabbage"]);

        args.strict = true;
        assert!(convert_files(&args).is_err());
    }

    #[test]
    fn student_filter_from_file() {
        init_logs();
        let mut args = test_args("basic");
        args.include_no_sub = true;
        let filter = format!(
            "@{}/tests/data/basic/students.txt",
            env!("CARGO_MANIFEST_DIR")
        );
        args.students = Some(vec![filter]);
        args.strict = true;
        let js = convert_files(&args).unwrap();
        assert_eq!(logins(&js), vec!["alovelace3", "ghopper"]);
    }

    #[test]
    fn broken_header() {
        init_logs();
        let mut args = test_args("broken_header");
        args.reference = None;
        match convert_files(&args) {
            Err(e) => assert!(matches!(
                *e,
                QuizError::Converting {
                    source: ConversionError::MissingSentinel { .. },
                    ..
                }
            )),
            Ok(_) => panic!("the conversion should fail"),
        }
    }

    #[test]
    fn missing_file() {
        init_logs();
        let mut args = test_args("basic");
        args.roster = "/nonexistent/roster.json".to_string();
        assert!(matches!(
            convert_files(&args).map_err(|e| *e),
            Err(QuizError::OpeningFile { .. })
        ));
    }

    #[test]
    fn report_without_attempt_column() {
        init_logs();
        let mut args = test_args("submitted_only");
        args.reference = None;
        let js = convert_files(&args).unwrap();
        // Every matched row counts as a submission.
        assert_eq!(logins(&js), vec!["alovelace3", "cbabbage"]);
        assert_eq!(js["students"][0]["attempt"], 1);
        assert_eq!(js["students"][0]["responses"][2]["response"], "It calls itself.");
        assert_eq!(js["students"][1]["attempt"], 1);

        args.include_no_sub = true;
        let js = convert_files(&args).unwrap();
        assert_eq!(logins(&js), vec!["alovelace3", "cbabbage", "ghopper"]);
        assert_eq!(js["students"][2]["attempt"], 0);
    }

    #[test]
    fn excel_report() {
        init_logs();
        let mut args = test_args("basic");
        args.input = args.input.replace("export.csv", "export.xlsx");
        args.input_type = Some("xlsx".to_string());
        assert!(run_conversion(&args).is_ok());

        args.excel_worksheet_name = Some("Report".to_string());
        assert!(run_conversion(&args).is_ok());
    }

    #[test]
    fn excel_report_missing_worksheet() {
        init_logs();
        let mut args = test_args("basic");
        args.input = args.input.replace("export.csv", "export.xlsx");
        args.input_type = Some("xlsx".to_string());
        args.excel_worksheet_name = Some("Sheet 2".to_string());
        match convert_files(&args).map_err(|e| *e) {
            Err(QuizError::MissingWorksheet { name, .. }) => assert_eq!(name, "Sheet 2"),
            x => panic!("unexpected result {:?}", x.map(|_| ())),
        }
    }

    #[test]
    fn unknown_input_type() {
        let mut args = test_args("basic");
        args.input_type = Some("pdf".to_string());
        assert!(convert_files(&args).is_err());
    }
}
