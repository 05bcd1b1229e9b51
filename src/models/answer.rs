// file: src/models/answer.rs
// description: final answer model and its console rendering
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub query: String,
    pub text: String,
    pub source: String,
}

impl Answer {
    /// Builds an answer, trimming surrounding whitespace from the generated text.
    pub fn new(query: impl Into<String>, generated: &str, source: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            text: generated.trim().to_string(),
            source: source.into(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QUESTION: {}", self.query)?;
        writeln!(f)?;
        writeln!(f, "FINAL ANSWER:")?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)?;
        writeln!(f, "HIGHEST WEIGHT DOCUMENT:")?;
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_answer_is_trimmed() {
        let answer = Answer::new(
            "Can interns work from home?",
            "\n  Only on Fridays.  \n",
            "policy.txt",
        );
        assert_eq!(answer.text, "Only on Fridays.");
    }

    #[test]
    fn test_render() {
        let answer = Answer::new(
            "Can interns work from home?",
            "Only on Fridays.",
            "policy.txt",
        );
        assert_eq!(
            answer.to_string(),
            "QUESTION: Can interns work from home?\n\nFINAL ANSWER:\nOnly on Fridays.\n\nHIGHEST WEIGHT DOCUMENT:\npolicy.txt"
        );
    }
}
