use crate::error::{Result, SimulationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Interest rate selector chosen by the borrower.
///
/// `Variable` carries a fixed premium over `Fixed`, see
/// [`RateTable`](crate::domain::pricing::RateTable).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateType {
    #[default]
    #[serde(alias = "fixed", alias = "Fixed")]
    Fixed,
    #[serde(alias = "variable", alias = "Variable")]
    Variable,
}

/// A loan simulation as submitted by a caller.
///
/// Amount and term are not validated on construction; the pricing engine
/// rejects non-positive values so that bad input surfaces as a typed error.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub principal: Decimal,
    pub birth_date: NaiveDate,
    pub term_months: i32,
    #[serde(default)]
    pub rate_type: RateType,
}

impl SimulationRequest {
    pub fn new(
        principal: Decimal,
        birth_date: NaiveDate,
        term_months: i32,
        rate_type: RateType,
    ) -> Self {
        Self {
            principal,
            birth_date,
            term_months,
            rate_type,
        }
    }
}

/// A priced simulation, written once to storage and never updated.
///
/// Fields are private: the only way to obtain a `Simulation` is through the
/// pricing engine (or by deserializing one that it produced), which keeps
/// `total_amount == monthly_installment * term_months` and
/// `total_interest == total_amount - principal`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    id: String,
    principal: Decimal,
    birth_date: NaiveDate,
    term_months: u32,
    total_amount: Decimal,
    monthly_installment: Decimal,
    total_interest: Decimal,
}

impl Simulation {
    pub(crate) fn new(
        id: String,
        principal: Decimal,
        birth_date: NaiveDate,
        term_months: u32,
        monthly_installment: Decimal,
    ) -> Result<Self> {
        let total_amount = monthly_installment
            .checked_mul(Decimal::from(term_months))
            .ok_or(SimulationError::ArithmeticOverflow)?;
        let total_interest = total_amount
            .checked_sub(principal)
            .ok_or(SimulationError::ArithmeticOverflow)?;
        Ok(Self {
            id,
            principal,
            birth_date,
            term_months,
            total_amount,
            monthly_installment,
            total_interest,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn monthly_installment(&self) -> Decimal {
        self.monthly_installment
    }

    pub fn total_interest(&self) -> Decimal {
        self.total_interest
    }
}

/// Caller-facing view of a [`Simulation`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub id: String,
    pub total_amount: Decimal,
    pub monthly_installment: Decimal,
    pub total_interest: Decimal,
    pub principal: Decimal,
    pub birth_date: NaiveDate,
    pub term_months: u32,
}

impl From<&Simulation> for SimulationResult {
    fn from(sim: &Simulation) -> Self {
        Self {
            id: sim.id.clone(),
            total_amount: sim.total_amount,
            monthly_installment: sim.monthly_installment,
            total_interest: sim.total_interest,
            principal: sim.principal,
            birth_date: sim.birth_date,
            term_months: sim.term_months,
        }
    }
}

impl From<Simulation> for SimulationResult {
    fn from(sim: Simulation) -> Self {
        Self::from(&sim)
    }
}
