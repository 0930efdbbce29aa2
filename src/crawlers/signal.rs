use crate::crawlers::crawler::ContinueSignal;
use crate::error::ScrapeError;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

/// Waits for the user to press ENTER on standard input
pub struct StdinContinue {
    reader: BufReader<Stdin>,
}

impl StdinContinue {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdinContinue {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinueSignal for StdinContinue {
    async fn wait_for_continue(&mut self) -> Result<(), ScrapeError> {
        println!("Solve any CAPTCHA or verification manually, then press ENTER here to continue...");
        println!("Do not close the browser window.");

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            ::log::warn!("Standard input closed; continuing without confirmation");
        } else {
            ::log::info!("Manual verification confirmed, resuming crawl");
        }
        Ok(())
    }
}

/// Continues immediately; used for unattended runs
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateContinue;

impl ContinueSignal for ImmediateContinue {
    async fn wait_for_continue(&mut self) -> Result<(), ScrapeError> {
        ::log::info!("Unattended run, not waiting for manual verification");
        Ok(())
    }
}
