use log::{error, info};
use std::str::{FromStr, SplitWhitespace};
use tokio::sync::mpsc::Sender;

use super::error::Error;
use super::types::{CaseStreamer, TestCase};
use common::error::Error as SolverError;
use common::types::{Cost, CostMatrix};

/// Pulls whitespace-separated values out of the input, counting tokens for error reports.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Tokens {
            inner: content.split_whitespace(),
            position: 0,
        }
    }

    fn next_value<T: FromStr>(&mut self, expected: &str) -> Result<T, Error> {
        let token = self.inner.next().ok_or_else(|| Error::UnexpectedEof {
            expected: expected.to_string(),
        })?;
        self.position += 1;

        token.parse::<T>().map_err(|_| Error::Parse {
            location: format!("token {}", self.position),
            token: token.to_string(),
        })
    }
}

/// Parses the text format: test count `T`, then for each case `N` followed by
/// `N*N` costs in row-major order. Trailing input after the last case is ignored.
pub fn parse_cases(content: &str) -> Result<Vec<TestCase>, Error> {
    let mut tokens = Tokens::new(content);
    let count: usize = tokens.next_value("the test case count")?;

    let mut cases = Vec::new();
    for index in 0..count {
        let size: usize = tokens.next_value("a matrix size")?;
        let cells_needed = size.checked_mul(size).ok_or(SolverError::CostOverflow)?;

        let cells = (0..cells_needed)
            .map(|_| tokens.next_value::<Cost>("a matrix cell"))
            .collect::<Result<Vec<_>, _>>()?;

        cases.push(TestCase {
            index,
            matrix: CostMatrix::new(size, cells)?,
        });
    }

    Ok(cases)
}

pub struct TextStreamer {
    path: String,
}

impl TextStreamer {
    pub fn new(path: String) -> Self {
        TextStreamer { path }
    }

    fn read_cases(&self) -> Result<Vec<TestCase>, Error> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            error!("Failed to read file {}: {:?}", self.path, e);
            Error::IoError(e)
        })?;
        parse_cases(&content)
    }
}

#[async_trait::async_trait]
impl CaseStreamer for TextStreamer {
    async fn run_stream(self, sender: Sender<TestCase>) -> Result<usize, Error> {
        let cases = self.read_cases()?;
        let total = cases.len();

        info!("TextStreamer: Starting transfer of {} cases...", total);

        for case in cases {
            if sender.send(case).await.is_err() {
                error!("TextStreamer shutting down: solver receiver dropped during send.");
                return Err(Error::ChannelSendFailed);
            }
        }

        info!("TextStreamer: Successfully transferred {} cases.", total);
        Ok(total)
    }
}
