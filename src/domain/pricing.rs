use super::simulation::{RateType, Simulation, SimulationRequest};
use crate::error::{Result, SimulationError};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Source of the evaluation date used to compute the borrower's age.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Age-banded annual rates, in percent.
///
/// Bands are `(max_age, rate)` pairs evaluated in order; the first band whose
/// `max_age` is greater than or equal to the age wins. Ages above the last
/// band get `above_last`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    bands: Vec<(u32, Decimal)>,
    above_last: Decimal,
    variable_premium: Decimal,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(
            vec![(25, dec!(5.0)), (40, dec!(3.0)), (60, dec!(2.0))],
            dec!(4.0),
            dec!(1.0),
        )
    }
}

impl RateTable {
    pub fn new(
        bands: Vec<(u32, Decimal)>,
        above_last: Decimal,
        variable_premium: Decimal,
    ) -> Self {
        Self {
            bands,
            above_last,
            variable_premium,
        }
    }

    /// A table charging `rate` at every age, with no variable premium.
    pub fn flat(rate: Decimal) -> Self {
        Self::new(Vec::new(), rate, Decimal::ZERO)
    }

    pub fn base_rate(&self, age: u32) -> Decimal {
        self.bands
            .iter()
            .find(|(max_age, _)| age <= *max_age)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.above_last)
    }

    pub fn annual_rate(&self, age: u32, rate_type: RateType) -> Decimal {
        let base = self.base_rate(age);
        match rate_type {
            RateType::Fixed => base,
            RateType::Variable => base + self.variable_premium,
        }
    }
}

/// Annual rate, in percent, for the standard age bands.
pub fn annual_rate(age: u32, rate_type: RateType) -> Decimal {
    RateTable::default().annual_rate(age, rate_type)
}

/// Converts an annual percentage into a monthly fraction.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / MONTHS_PER_YEAR / PERCENT
}

/// Fixed installment amortizing `principal` over `term` months at `rate` per month.
///
/// A zero rate degrades to straight-line repayment.
pub fn monthly_payment(principal: Decimal, rate: Decimal, term: u32) -> Result<Decimal> {
    if term == 0 {
        return Err(SimulationError::InvalidAmount);
    }
    let periods = Decimal::from(term);
    if rate.is_zero() {
        return principal
            .checked_div(periods)
            .ok_or(SimulationError::ArithmeticOverflow);
    }

    // P * r / (1 - (1 + r)^-n)
    let growth = (Decimal::ONE + rate)
        .checked_powi(i64::from(term))
        .ok_or(SimulationError::ArithmeticOverflow)?;
    let discount = Decimal::ONE
        .checked_div(growth)
        .ok_or(SimulationError::ArithmeticOverflow)?;
    let denominator = Decimal::ONE - discount;
    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(denominator))
        .ok_or(SimulationError::ArithmeticOverflow)
}

/// Whole years elapsed between `birth_date` and `today`.
///
/// Negative when `birth_date` lies in the future.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    years
}

/// Turns a [`SimulationRequest`] into a priced [`Simulation`].
///
/// Pure apart from the clock read and identifier generation.
#[derive(Clone)]
pub struct PricingEngine {
    rates: RateTable,
    clock: Arc<dyn Clock>,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(RateTable::default(), Arc::new(SystemClock))
    }
}

impl PricingEngine {
    pub fn new(rates: RateTable, clock: Arc<dyn Clock>) -> Self {
        Self { rates, clock }
    }

    pub fn price(&self, request: &SimulationRequest) -> Result<Simulation> {
        self.price_on(request, self.clock.today())
    }

    /// Prices `request` as if evaluated on `today`.
    pub fn price_on(&self, request: &SimulationRequest, today: NaiveDate) -> Result<Simulation> {
        if request.principal <= Decimal::ZERO || request.term_months <= 0 {
            return Err(SimulationError::InvalidAmount);
        }
        let term = request.term_months.unsigned_abs();

        let age = age_on(request.birth_date, today);
        if age <= 0 {
            return Err(SimulationError::InvalidBirthDate);
        }

        let annual = self.rates.annual_rate(age.unsigned_abs(), request.rate_type);
        let installment = monthly_payment(request.principal, monthly_rate(annual), term)?;

        Simulation::new(
            Uuid::new_v4().to_string(),
            request.principal,
            request.birth_date,
            term,
            installment,
        )
    }
}
