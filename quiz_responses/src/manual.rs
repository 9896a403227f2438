/*!

This is the long-form manual for `quiz_responses` and `quizparse`.

## The export

The input is the "student analysis" report of a quiz, as a CSV file. The first
row is the header. Every other row is one submission.

The header looks like this (the columns before `submitted` vary between
exports and are ignored):

```text
name,id,sis_id,section,section_id,section_sis_id,submitted,attempt,"101: Explain recursion",5.0,"102: Capital of [a]",2.0,n correct,n incorrect,score
```

* `id` is the identifier of the student, matched against the roster. If the
  column appears several times, the last one is used.
* the questions start after the last of `submitted` and `attempt`, and stop
  before `n correct`.
* each question takes two columns: the answer, then the score. The header of the
  answer column starts with the question identifier followed by a colon.

The score column is empty when the student did not answer the question. An
empty answer with a score is still an answer.

If any of these columns cannot be found, the conversion fails: guessing the
layout would attribute answers to the wrong questions.

## Answers

The decoding depends on the type of the question in the catalog:

* `essay_question`: the cell, verbatim.
* `fill_in_multiple_blanks_question`: the blanks are separated by commas. A comma
  inside a blank is written `\,`. The cell `a\,b,c` holds two blanks: `a,b` and
  `c`.
* any other type: the cell, verbatim.

## Students

The roster decides who is in the output: every student of the roster gets one
record, in roster order, and nobody else. Rows of students who are not in the
roster (test students, previews) are dropped. Students without a row get a record
without answers. The names, logins and emails always come from the roster.

If a student has several rows, the first one is used. `quizparse` can select
the first or the last attempt beforehand with `--attempt-strategy`.

The output also contains a template: a record without answers and with blank
names, to print an empty answer sheet.

## Question order

The questions are displayed by position in the catalog, then by identifier
(compared as numbers). The responses of every record follow the same order.

## Command line

```bash
quizparse -i report.csv --questions questions.json --roster roster.json -o out.json
```

`questions.json` is the list of questions of the quiz, as returned by the
learning platform (`id`, `question_type`, `question_name`, `question_text`,
`points_possible`, `position`). `roster.json` is the list of students (`id`,
`login_id`, `email`, `name`, `sis_user_id`).

The other options:
* `--input-type xlsx` reads an export that was saved as a spreadsheet.
* `--students` keeps only some students (repeat the flag, or pass `@file` with one
  login per line). With `--strict`, naming a student who is not in the roster is
  an error.
* `--include-no-sub` keeps the students who did not submit anything.
* `--template include|only|exclude` controls the template in the output.
* `--reference` compares the output with a previous output and fails on any
  difference.
*/
