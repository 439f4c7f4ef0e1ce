//! Session - the interactive question/answer loop
//!
//! Each turn reads a question, looks for the closest stored one and either
//! answers or asks the user to teach an answer:
//!
//! ```text
//! AwaitingInput -> Matching -> Answering -> AwaitingInput
//!                           -> Teaching  -> AwaitingInput
//! AwaitingInput -> Exited   (on "quit" or end of input)
//! ```
//!
//! Nothing in here is fatal except failing to write to the output. Storage
//! problems are reported in the conversation and the session carries on.

use qabot_common::{find_best_match, get_answer, KnowledgeBase, KnowledgeStore, QaPair};
use std::io::{self, BufRead, ErrorKind, Write};
use tracing::{debug, error, info, warn};

use crate::ui::Ui;

/// Typing this (any case) ends the session
pub const EXIT_TOKEN: &str = "quit";

/// Typing this (any case) at the teach prompt declines to teach
pub const SKIP_TOKEN: &str = "skip";

pub const MSG_GOODBYE: &str = "Goodbye!";
pub const MSG_EMPTY_QUESTION: &str = "Please enter a valid question.";
pub const MSG_UNREADABLE_INPUT: &str = "I couldn't read that input.";
pub const MSG_NO_ANSWER_FOR_MATCH: &str = "I found a match, but I don't have an answer for it.";
pub const MSG_TEACH_ME: &str = "I don't know the answer. Can you teach me?";
pub const MSG_EMPTY_ANSWER: &str = "No answer given, skipping.";
pub const MSG_THANKS: &str = "Thank you for teaching me!";

/// What the knowledge base says about a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<'a> {
    /// A stored question matched and has an answer
    Answer(&'a str),
    /// A stored question matched but its answer is empty
    MatchedWithoutAnswer,
    /// Nothing was similar enough
    Unknown,
}

/// Look up a reply for `question` without changing anything
pub fn respond<'a>(kb: &'a KnowledgeBase, question: &str) -> Reply<'a> {
    match find_best_match(question, kb.questions()) {
        Some(matched) => match get_answer(matched, kb) {
            Some(answer) => Reply::Answer(answer),
            None => {
                warn!(question = matched, "Matched question has no answer");
                Reply::MatchedWithoutAnswer
            }
        },
        None => Reply::Unknown,
    }
}

/// How a single turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Exit token or end of input
    Exited,
    /// Blank or unreadable input; nothing happened
    Rejected,
    /// Answered from the knowledge base
    Answered(String),
    /// Matched a stored question whose answer is missing
    MatchedWithoutAnswer,
    /// New pair appended and saved
    Taught,
    /// New pair appended but saving failed; it lives in memory only
    TaughtUnsaved,
    /// User declined to teach
    Skipped,
}

/// One interactive conversation over a knowledge base it owns
pub struct Session<'s, R, W> {
    kb: KnowledgeBase,
    store: &'s dyn KnowledgeStore,
    input: R,
    output: W,
    ui: Ui,
}

impl<'s, R: BufRead, W: Write> Session<'s, R, W> {
    pub fn new(kb: KnowledgeBase, store: &'s dyn KnowledgeStore, input: R, output: W, ui: Ui) -> Self {
        Self {
            kb,
            store,
            input,
            output,
            ui,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn into_knowledge_base(self) -> KnowledgeBase {
        self.kb
    }

    /// Run turns until the user quits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        info!(entries = self.kb.len(), "Session started");
        while self.turn()? != Turn::Exited {}
        info!(entries = self.kb.len(), "Session ended");
        Ok(())
    }

    /// Prompt for one question and handle it
    pub fn turn(&mut self) -> io::Result<Turn> {
        let prompt = self.ui.you_prompt();
        let line = match self.prompt(&prompt) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("End of input");
                self.say(MSG_GOODBYE)?;
                return Ok(Turn::Exited);
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Unreadable input: {}", e);
                self.say(MSG_UNREADABLE_INPUT)?;
                return Ok(Turn::Rejected);
            }
            Err(e) => return Err(e),
        };

        let question = line.trim();

        if question.eq_ignore_ascii_case(EXIT_TOKEN) {
            self.say(MSG_GOODBYE)?;
            return Ok(Turn::Exited);
        }

        if question.is_empty() {
            self.say(MSG_EMPTY_QUESTION)?;
            return Ok(Turn::Rejected);
        }

        let reply = match respond(&self.kb, question) {
            Reply::Answer(answer) => Some(answer.to_string()),
            Reply::MatchedWithoutAnswer => None,
            Reply::Unknown => return self.teach(question.to_string()),
        };

        match reply {
            Some(answer) => {
                self.say(&answer)?;
                Ok(Turn::Answered(answer))
            }
            None => {
                self.say(MSG_NO_ANSWER_FOR_MATCH)?;
                Ok(Turn::MatchedWithoutAnswer)
            }
        }
    }

    /// Ask the user for an answer to `question` and store it
    fn teach(&mut self, question: String) -> io::Result<Turn> {
        self.say(MSG_TEACH_ME)?;

        let prompt = self.ui.teach_prompt();
        let answer = match self.prompt(&prompt) {
            Ok(Some(line)) => line.trim().to_string(),
            // The next prompt sees the same end of input and exits
            Ok(None) => return Ok(Turn::Skipped),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Unreadable answer: {}", e);
                self.say(MSG_UNREADABLE_INPUT)?;
                return Ok(Turn::Skipped);
            }
            Err(e) => return Err(e),
        };

        if answer.eq_ignore_ascii_case(SKIP_TOKEN) {
            debug!(question = %question, "Teaching skipped");
            return Ok(Turn::Skipped);
        }

        if answer.is_empty() {
            self.say(MSG_EMPTY_ANSWER)?;
            return Ok(Turn::Skipped);
        }

        info!(question = %question, "Learned new answer");
        self.kb.push(QaPair::new(question, answer));

        match self.store.save(&self.kb) {
            Ok(()) => {
                self.say(MSG_THANKS)?;
                Ok(Turn::Taught)
            }
            Err(e) => {
                error!(kind = e.kind(), "Failed to save knowledge base: {}", e);
                self.say(&format!(
                    "I couldn't save that to disk ({}). I'll remember it for this session.",
                    e
                ))?;
                Ok(Turn::TaughtUnsaved)
            }
        }
    }

    /// Print `prompt` and read one line. `None` means end of input.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => {
                // Keep the transcript tidy when input ends mid-prompt
                writeln!(self.output)?;
                Ok(None)
            }
            _ => Ok(Some(line)),
        }
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", self.ui.bot(message))
    }
}
