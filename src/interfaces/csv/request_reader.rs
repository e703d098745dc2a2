use crate::domain::simulation::{RateType, SimulationRequest};
use crate::error::{Result, SimulationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RequestRecord {
    principal: Decimal,
    birth_date: NaiveDate,
    term_months: i32,
    rate_type: Option<RateType>,
}

impl From<RequestRecord> for SimulationRequest {
    fn from(record: RequestRecord) -> Self {
        SimulationRequest::new(
            record.principal,
            record.birth_date,
            record.term_months,
            record.rate_type.unwrap_or_default(),
        )
    }
}

/// Reads simulation requests from a CSV source.
///
/// Expects the header `principal,birth_date,term_months,rate_type`. Fields are
/// trimmed and an empty `rate_type` means fixed.
pub struct SimulationRequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SimulationRequestReader<R> {
    /// Creates a new `SimulationRequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<SimulationRequest>> {
        self.reader.into_deserialize().map(|record| {
            record
                .map(|r: RequestRecord| r.into())
                .map_err(SimulationError::from)
        })
    }
}
