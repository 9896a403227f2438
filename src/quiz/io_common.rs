use crate::quiz::*;

/// The logins given on the command line. A login starting with '@' is a file with
/// one login per line.
///
/// The result is sorted and without duplicates.
pub fn read_student_filter(students: &Option<Vec<String>>) -> BQuizResult<Vec<String>> {
    let mut logins: Vec<String> = Vec::new();
    for s in students.iter().flatten() {
        if let Some(path) = s.strip_prefix('@') {
            let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
            logins.extend(
                contents
                    .lines()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty())
                    .map(|l| l.to_string()),
            );
        } else {
            logins.push(s.clone());
        }
    }
    logins.sort();
    logins.dedup();
    debug!("read_student_filter: {:?}", logins);
    Ok(logins)
}
