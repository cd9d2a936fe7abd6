use csv::{ReaderBuilder, StringRecord, Trim};
use log::{error, info};
use std::fs::File;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use super::types::{CaseStreamer, TestCase};
use common::types::{Cost, CostMatrix};

pub struct CsvStreamer {
    path: String,
}

impl CsvStreamer {
    pub fn new(path: String) -> Self {
        CsvStreamer { path }
    }

    /// Turns one record `N, c00, c01, ...` into a case.
    fn record_to_case(index: usize, record: &StringRecord) -> Result<TestCase, Error> {
        let parse_error = |field: usize, token: &str| Error::Parse {
            location: format!("record {}, field {}", index + 1, field + 1),
            token: token.to_string(),
        };

        let mut fields = record.iter().enumerate();
        let (_, size_field) = fields.next().ok_or_else(|| Error::UnexpectedEof {
            expected: format!("a matrix size in record {}", index + 1),
        })?;
        let size: usize = size_field
            .parse()
            .map_err(|_| parse_error(0, size_field))?;

        let cells = fields
            .map(|(i, field)| field.parse::<Cost>().map_err(|_| parse_error(i, field)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TestCase {
            index,
            matrix: CostMatrix::new(size, cells)?,
        })
    }

    fn parse_csv_to_cases(&self) -> Result<Vec<TestCase>, Error> {
        let file = File::open(&self.path).map_err(|e| {
            error!("Failed to read file {}: {:?}", self.path, e);
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut cases = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let record = result?;
            cases.push(Self::record_to_case(index, &record)?);
        }
        Ok(cases)
    }
}

#[async_trait::async_trait]
impl CaseStreamer for CsvStreamer {
    async fn run_stream(self, sender: Sender<TestCase>) -> Result<usize, Error> {
        let all_cases = self.parse_csv_to_cases()?;
        let total_cases = all_cases.len();

        info!("CsvStreamer: Starting transfer of {} cases...", total_cases);

        for case in all_cases {
            if let Err(e) = sender.send(case).await {
                error!(
                    "CsvStreamer shutting down: solver receiver dropped during send. Error: {}",
                    e
                );
                return Err(Error::ChannelSendFailed);
            }
        }

        info!("CsvStreamer: Successfully transferred {} cases.", total_cases);
        Ok(total_cases)
    }
}
