use crate::domain::simulation::SimulationResult;
use crate::error::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    id: &'a str,
    principal: Decimal,
    birth_date: NaiveDate,
    term_months: u32,
    total_amount: Decimal,
    monthly_installment: Decimal,
    total_interest: Decimal,
}

impl<'a> From<&'a SimulationResult> for ResultRecord<'a> {
    fn from(result: &'a SimulationResult) -> Self {
        Self {
            id: &result.id,
            principal: result.principal.normalize(),
            birth_date: result.birth_date,
            term_months: result.term_months,
            total_amount: result.total_amount.round_dp(2),
            monthly_installment: result.monthly_installment.round_dp(2),
            total_interest: result.total_interest.round_dp(2),
        }
    }
}

/// Writes simulation results as CSV. Principal is written normalized and
/// the derived money columns are rounded to two decimals.
pub struct SimulationResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SimulationResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_results<'a, I>(&mut self, results: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SimulationResult>,
    {
        for result in results {
            self.writer.serialize(ResultRecord::from(result))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writer_rounds_money() {
        let result = SimulationResult {
            id: "abc".into(),
            total_amount: dec!(1016.3243851),
            monthly_installment: dec!(84.6936987),
            total_interest: dec!(16.3243851),
            principal: dec!(1000.0),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            term_months: 12,
        };

        let mut buffer = Vec::new();
        SimulationResultWriter::new(&mut buffer)
            .write_results([&result])
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some(
                "id,principal,birth_date,term_months,total_amount,monthly_installment,total_interest"
            )
        );
        assert_eq!(lines.next(), Some("abc,1000,1990-01-01,12,1016.32,84.69,16.32"));
    }

    #[test]
    fn test_writer_without_results_writes_nothing() {
        let mut buffer = Vec::new();
        SimulationResultWriter::new(&mut buffer)
            .write_results(std::iter::empty())
            .unwrap();
        assert!(buffer.is_empty());
    }
}
