//! Non-interactive commands
//!
//! These read the knowledge base but never teach or save.

use qabot_common::KnowledgeBase;
use std::io::{self, Write};

use crate::session::{respond, Reply, MSG_EMPTY_QUESTION, MSG_NO_ANSWER_FOR_MATCH};
use crate::ui::Ui;

pub const MSG_UNKNOWN: &str = "I don't know the answer.";
pub const MSG_EMPTY_KB: &str = "The knowledge base is empty.";

/// Answer one question and return
pub fn ask<W: Write>(kb: &KnowledgeBase, words: &[String], ui: Ui, out: &mut W) -> io::Result<()> {
    let question = words.join(" ");
    let question = question.trim();

    let message = if question.is_empty() {
        MSG_EMPTY_QUESTION
    } else {
        match respond(kb, question) {
            Reply::Answer(answer) => answer,
            Reply::MatchedWithoutAnswer => MSG_NO_ANSWER_FOR_MATCH,
            Reply::Unknown => MSG_UNKNOWN,
        }
    };

    writeln!(out, "{}", ui.bot(message))
}

/// Print every stored pair, numbered, or as the raw file format
pub fn list<W: Write>(kb: &KnowledgeBase, json: bool, ui: Ui, out: &mut W) -> io::Result<()> {
    if json {
        let content = serde_json::to_string_pretty(kb)?;
        return writeln!(out, "{}", content);
    }

    if kb.is_empty() {
        return writeln!(out, "{}", ui.dim(MSG_EMPTY_KB));
    }

    for (i, pair) in kb.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, ui.question(&pair.question))?;
        let answer = if pair.has_answer() {
            pair.answer.clone()
        } else {
            ui.dim("(no answer)")
        };
        writeln!(out, "     {}", answer)?;
    }

    Ok(())
}
