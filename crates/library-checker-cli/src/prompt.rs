use console::Term;
use library_checker_core::Prompt;
use std::io::{self, BufRead};

/// Line-based prompt on the controlling terminal. Falls back to plain
/// stdin when input is piped.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Like [`Prompt::ask`] but without echoing the answer.
    pub fn ask_secret(&mut self, question: &str) -> io::Result<String> {
        self.term.write_str(question)?;
        if self.term.is_term() {
            self.term.read_secure_line()
        } else {
            read_stdin_line()
        }
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.term.write_str(question)?;
        if self.term.is_term() {
            self.term.read_line()
        } else {
            read_stdin_line()
        }
    }
}

fn read_stdin_line() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(&['\r', '\n'][..]).to_string())
}
