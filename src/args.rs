use clap::Parser;

/// Converts the report of a quiz into the complete answers of every student.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The report of the quiz (student analysis), as exported by the learning platform.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default csv) The type of the input: 'csv' or 'xlsx' (a report saved as an Excel spreadsheet).
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the only worksheet) When using an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) The questions of the quiz in JSON format, as returned by the learning platform.
    #[clap(short, long, value_parser)]
    pub questions: String,

    /// (file path) The students of the course in JSON format, as returned by the learning platform.
    #[clap(short, long, value_parser)]
    pub roster: String,

    /// (file path, 'stdout' or empty) If specified, the conversion will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a previous output in JSON format. If provided,
    /// quizparse will check that the output matches the reference.
    #[clap(long, value_parser)]
    pub reference: Option<String>,

    /// (list of logins or not specified) If specified, only these students are processed.
    /// A value starting with '@' is a file with one login per line.
    #[clap(long, value_parser)]
    pub students: Option<Vec<String>>,

    /// (default last) Which row to use for a student with several attempts: 'first' or 'last'.
    #[clap(long, value_parser)]
    pub attempt_strategy: Option<String>,

    /// (default include) 'include' writes the template with the students, 'only' writes only
    /// the template, 'exclude' leaves it out.
    #[clap(long, value_parser)]
    pub template: Option<String>,

    /// If passed as an argument, the students without a submission are also written.
    #[clap(long, takes_value = false)]
    pub include_no_sub: bool,

    /// If passed as an argument, warnings about the student filter become errors.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
