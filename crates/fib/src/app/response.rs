//! Interactive construction of response files holding a replayable `bundle` invocation.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::domain::errors::ResponseError;
use crate::infra::console::{Level, Reporter};

/// Answers collected from the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAnswers {
    pub output: String,
    pub languages: String,
    pub note: bool,
    pub sort: String,
    pub remove_empty_lines: bool,
    /// Present only when the author header was requested and a name was given.
    pub author: Option<String>,
}

/// Single-line command encoding a full `bundle` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload {
    program: String,
    answers: ResponseAnswers,
}

impl ResponsePayload {
    pub fn new(program: impl Into<String>, answers: ResponseAnswers) -> Self {
        Self {
            program: program.into(),
            answers,
        }
    }

    pub fn answers(&self) -> &ResponseAnswers {
        &self.answers
    }

    pub fn render(&self) -> String {
        let answers = &self.answers;
        let mut line = format!(
            "{} bundle --output {} --language {}",
            self.program,
            quote(&answers.output),
            quote(&answers.languages)
        );
        if answers.note {
            line.push_str(" --note");
        }
        let sort = answers.sort.trim();
        line.push_str(" --sort ");
        line.push_str(&quote(if sort.is_empty() { "none" } else { sort }));
        if answers.remove_empty_lines {
            line.push_str(" --remove_empty_lines");
        }
        if let Some(author) = &answers.author {
            line.push_str(" --author ");
            line.push_str(&quote(author));
        }
        line
    }
}

/// Wrap values containing whitespace in double quotes so the line splits back into the same
/// arguments.
fn quote(value: &str) -> Cow<'_, str> {
    if value.chars().any(char::is_whitespace) || value.contains('"') {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\\\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Prompts for bundle options on `input` and writes the resulting response file.
pub struct ResponseFileBuilder<R> {
    input: R,
    program: String,
}

impl<R: BufRead> ResponseFileBuilder<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            program: "fib".into(),
        }
    }

    /// Program name written at the start of the command line.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run the prompt sequence without touching the filesystem.
    pub fn collect(
        &mut self,
        reporter: &mut dyn Reporter,
    ) -> Result<ResponseAnswers, ResponseError> {
        reporter.report(Level::Info, "enter details for bundle file");
        reporter.report(Level::Info, "enter path");
        let output = self.required("output path", "Error: the path is invalid", reporter)?;

        reporter.report(Level::Info, "enter chosen languages | all");
        let languages =
            self.required("languages", "Error: the languages are invalid", reporter)?;

        reporter.report(Level::Info, "add the source of the file as comment (y/n)");
        let note = is_yes(&self.answer("note answer")?);

        reporter.report(Level::Info, "sort the file by (alphabetic/language/none)");
        let sort = self.answer("sort mode")?.trim().to_owned();

        reporter.report(Level::Info, "remove empty lines (y/n)");
        let remove_empty_lines = is_yes(&self.answer("remove empty lines answer")?);

        reporter.report(Level::Info, "add the author of the file as comment (y/n)");
        let author = if is_yes(&self.answer("author answer")?) {
            reporter.report(Level::Info, "enter the author name");
            Some(self.answer("author name")?.trim().to_owned()).filter(|name| !name.is_empty())
        } else {
            None
        };

        Ok(ResponseAnswers {
            output,
            languages,
            note,
            sort,
            remove_empty_lines,
            author,
        })
    }

    /// Collect answers and write the payload to the entered output path.
    pub fn build(&mut self, reporter: &mut dyn Reporter) -> Result<PathBuf, ResponseError> {
        let answers = self.collect(reporter)?;
        let payload = ResponsePayload::new(self.program.clone(), answers);
        let path = PathBuf::from(&payload.answers().output);

        let mut file = File::create(&path)?;
        file.write_all(payload.render().as_bytes())?;
        file.flush()?;

        tracing::info!(path = %path.display(), "response file written");
        Ok(path)
    }

    fn answer(&mut self, what: &'static str) -> Result<String, ResponseError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ResponseError::InputClosed(what));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn required(
        &mut self,
        what: &'static str,
        retry_message: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<String, ResponseError> {
        loop {
            let answer = self.answer(what)?;
            let trimmed = answer.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_owned());
            }
            reporter.report(Level::Error, retry_message);
        }
    }
}

/// Command handler: run the interactive builder and report the outcome on the console.
pub fn run_create_rsp<R: BufRead>(
    mut builder: ResponseFileBuilder<R>,
    reporter: &mut dyn Reporter,
) {
    match builder.build(reporter) {
        Ok(path) => reporter.report(
            Level::Info,
            &format!("RSP file '{}' created successfully.", path.display()),
        ),
        Err(err) => {
            tracing::debug!(error = %err, "response file creation failed");
            reporter.report(Level::Error, "Error: response file creation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::console::Recorder;
    use std::fs;
    use std::io::Cursor;

    fn answers() -> ResponseAnswers {
        ResponseAnswers {
            output: "out.rsp".into(),
            languages: "all".into(),
            note: true,
            sort: "alphabetic".into(),
            remove_empty_lines: false,
            author: Some("Sam".into()),
        }
    }

    #[test]
    fn renders_full_command_line() {
        let payload = ResponsePayload::new("fib", answers());
        assert_eq!(
            payload.render(),
            "fib bundle --output out.rsp --language all --note --sort alphabetic --author Sam"
        );
    }

    #[test]
    fn quotes_values_with_spaces() {
        let mut answers = answers();
        answers.languages = ".cs .py".into();
        answers.author = Some("Jane Doe".into());
        answers.note = false;
        answers.remove_empty_lines = true;
        answers.sort = String::new();

        let rendered = ResponsePayload::new("fib", answers).render();
        assert_eq!(
            rendered,
            "fib bundle --output out.rsp --language \".cs .py\" --sort none --remove_empty_lines --author \"Jane Doe\""
        );
    }

    #[test]
    fn retries_blank_required_answers() -> anyhow::Result<()> {
        let input = Cursor::new("\n  \nout.rsp\n\n.rs\nN\nlanguage\nY\nn\n");
        let mut recorder = Recorder::default();
        let collected = ResponseFileBuilder::new(input).collect(&mut recorder)?;

        assert_eq!(collected.output, "out.rsp");
        assert_eq!(collected.languages, ".rs");
        assert!(!collected.note);
        assert_eq!(collected.sort, "language");
        assert!(collected.remove_empty_lines);
        assert_eq!(collected.author, None);
        assert_eq!(
            recorder.errors().collect::<Vec<_>>(),
            vec![
                "Error: the path is invalid",
                "Error: the path is invalid",
                "Error: the languages are invalid"
            ]
        );
        Ok(())
    }

    #[test]
    fn author_requires_a_name() -> anyhow::Result<()> {
        let input = Cursor::new("out.rsp\nall\nn\nnone\nn\ny\n   \n");
        let collected = ResponseFileBuilder::new(input).collect(&mut Recorder::default())?;
        assert_eq!(collected.author, None);
        Ok(())
    }

    #[test]
    fn closed_input_is_an_error() {
        let input = Cursor::new("\n\n");
        let err = ResponseFileBuilder::new(input)
            .collect(&mut Recorder::default())
            .unwrap_err();
        assert!(matches!(err, ResponseError::InputClosed("output path")));
    }

    #[test]
    fn build_writes_payload_without_trailing_newline() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let target = temp.path().join("out.rsp");
        let input = Cursor::new(format!(
            "{}\nall\ny\nalphabetic\nn\ny\nSam\n",
            target.display()
        ));
        let mut recorder = Recorder::default();

        run_create_rsp(ResponseFileBuilder::new(input), &mut recorder);

        let written = fs::read_to_string(&target)?;
        assert_eq!(
            written,
            format!(
                "fib bundle --output {} --language all --note --sort alphabetic --author Sam",
                quote(&target.display().to_string())
            )
        );
        assert!(recorder.errors().next().is_none());
        assert!(
            recorder
                .infos()
                .any(|message| message.starts_with("RSP file '"))
        );
        Ok(())
    }

    #[test]
    fn unwritable_path_reports_fixed_message() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let target = temp.path().join("missing/out.rsp");
        let input = Cursor::new(format!("{}\nall\nn\nnone\nn\nn\n", target.display()));
        let mut recorder = Recorder::default();

        run_create_rsp(ResponseFileBuilder::new(input), &mut recorder);

        assert_eq!(
            recorder.errors().collect::<Vec<_>>(),
            vec!["Error: response file creation failed"]
        );
        assert!(!target.exists());
        Ok(())
    }
}
