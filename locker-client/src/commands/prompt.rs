use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-based input for the interactive steps (OTP entry, picking from a list)
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(stdin()).lines(),
        }
    }

    pub async fn ask(&mut self, label: &str) -> Result<String> {
        print!("{}: ", label);
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = self
            .lines
            .next_line()
            .await
            .context("Failed to read input")?
            .context("Input closed")?;
        Ok(line.trim().to_string())
    }

    /// Ask for a 1-based choice among `count` entries
    pub async fn choose(&mut self, label: &str, count: usize) -> Result<usize> {
        loop {
            let answer = self.ask(label).await?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
                _ => println!("❌ Enter a number between 1 and {}", count),
            }
        }
    }
}
