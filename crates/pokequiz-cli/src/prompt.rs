//! Line-oriented terminal input.

use std::io::Write;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one line, trimmed.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        print!("{question}");
        std::io::stdout().flush()?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("input closed"),
        }
    }

    /// Ask until a non-empty answer is given.
    pub async fn ask_non_empty(&mut self, question: &str) -> Result<String> {
        loop {
            let answer = self.ask(question).await?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    /// Ask a yes/no question; anything but `y`/`yes` is a no.
    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{question} [y/N] ")).await?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}
