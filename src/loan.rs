use crate::error::LoanError;
use crate::parse::{round_cents, InputValue};
use chrono::{Months, NaiveDate};
use log::{debug, trace, warn};
use std::fmt;

// 100 years of monthly payments
pub const MAX_MONTHS: u32 = 1200;

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LoanSpec {
    pub principal: InputValue,
    pub rate: InputValue,
    #[cfg_attr(feature = "serde", serde(default))]
    pub term_years: Option<InputValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub monthly_payment: Option<InputValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_monthly_payment: Option<InputValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub first_payment_date: Option<NaiveDate>,
}

impl LoanSpec {
    pub fn with_term(
        principal: impl Into<InputValue>,
        rate: impl Into<InputValue>,
        term_years: impl Into<InputValue>,
    ) -> Self {
        Self {
            principal: principal.into(),
            rate: rate.into(),
            term_years: Some(term_years.into()),
            ..Self::default()
        }
    }

    pub fn with_payment(
        principal: impl Into<InputValue>,
        rate: impl Into<InputValue>,
        monthly_payment: impl Into<InputValue>,
    ) -> Self {
        Self {
            principal: principal.into(),
            rate: rate.into(),
            monthly_payment: Some(monthly_payment.into()),
            ..Self::default()
        }
    }

    pub fn extra_payment(mut self, extra: impl Into<InputValue>) -> Self {
        self.extra_monthly_payment = Some(extra.into());
        self
    }

    pub fn first_payment(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    pub fn validate(&self) -> Result<LoanTerms, LoanError> {
        validate(self)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PaymentBasis {
    Term { years: u32 },
    Fixed { payment: f64 },
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoanTerms {
    pub principal: f64,
    // percent, e.g. 2.99
    pub annual_rate: f64,
    pub basis: PaymentBasis,
    pub extra_payment: f64,
    pub first_payment_date: Option<NaiveDate>,
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 1200.
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MonthEntry {
    pub month_number: u32,
    pub payment_date: Option<NaiveDate>,
    pub starting_principal: f64,
    pub interest_portion: f64,
    // regular and extra principal combined
    pub principal_portion: f64,
    pub ending_principal: f64,
}

impl MonthEntry {
    pub fn new(
        month_number: u32,
        payment_date: Option<NaiveDate>,
        starting_principal: f64,
        interest_portion: f64,
        principal_portion: f64,
        ending_principal: f64,
    ) -> Self {
        Self {
            month_number,
            payment_date,
            starting_principal: round_cents(starting_principal),
            interest_portion: round_cents(interest_portion),
            principal_portion: round_cents(principal_portion),
            ending_principal: round_cents(ending_principal),
        }
    }
}

impl fmt::Display for MonthEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month {}", self.month_number)?;
        if let Some(date) = self.payment_date {
            write!(f, ", date {}", date)?;
        }
        write!(
            f,
            ", starting principal ${:.2}, interest ${:.2}, principal ${:.2}, ending principal ${:.2}",
            self.starting_principal,
            self.interest_portion,
            self.principal_portion,
            self.ending_principal
        )
    }
}

/// Outcome of [`calculate`].
///
/// Always fully populated: a failed calculation has an empty schedule, zero
/// interest and an `Error: ` message rather than missing fields.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScheduleResult {
    pub loan_months: Vec<MonthEntry>,
    pub total_interest_paid: f64,
    pub loan_message: String,
    pub monthly_payment: Option<f64>,
    pub payoff_date: Option<NaiveDate>,
    pub error: Option<LoanError>,
}

impl ScheduleResult {
    fn failed(error: LoanError) -> Self {
        Self {
            loan_months: Vec::new(),
            total_interest_paid: 0.,
            loan_message: format!("Error: {}", error),
            monthly_payment: None,
            payoff_date: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn months_to_payoff(&self) -> usize {
        self.loan_months.len()
    }

    pub fn month(&self, month_number: usize) -> Option<&MonthEntry> {
        month_number
            .checked_sub(1)
            .and_then(|index| self.loan_months.get(index))
    }
}

impl fmt::Display for ScheduleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.monthly_payment {
            Some(payment) if self.is_ok() => write!(
                f,
                "{} Monthly payment ${:.2}, total interest paid ${:.2}.",
                self.loan_message, payment, self.total_interest_paid
            ),
            _ => write!(f, "{}", self.loan_message),
        }
    }
}

pub fn calculate(spec: &LoanSpec) -> ScheduleResult {
    let terms = match validate(spec) {
        Ok(terms) => terms,
        Err(e) => return ScheduleResult::failed(e),
    };
    let pmt_amount = match get_pmt_amount(&terms) {
        Ok(amount) => amount,
        Err(e) => return ScheduleResult::failed(e),
    };
    debug!(
        "principal {}, rate {}%, basis {:?}, extra {}, payment {}",
        terms.principal, terms.annual_rate, terms.basis, terms.extra_payment, pmt_amount
    );

    match scheduled_months(&terms, pmt_amount) {
        Ok((loan_months, total_interest)) => {
            let payoff_date = loan_months.last().and_then(|m| m.payment_date);
            ScheduleResult {
                loan_message: payoff_message(loan_months.len()),
                loan_months,
                total_interest_paid: round_cents(total_interest),
                monthly_payment: Some(round_cents(pmt_amount)),
                payoff_date,
                error: None,
            }
        }
        Err(e) => ScheduleResult::failed(e),
    }
}

pub fn validate(spec: &LoanSpec) -> Result<LoanTerms, LoanError> {
    let principal = spec.principal.currency();
    if principal <= 0. || !principal.is_finite() {
        return Err(LoanError::InvalidPrincipal);
    }

    // 0% is a legitimate loan; only unreadable or negative rates are refused
    let annual_rate = match spec.rate.try_rate_percent() {
        Some(rate) if rate >= 0. => rate,
        _ => return Err(LoanError::InvalidRate),
    };

    let term_years = supplied(&spec.term_years).map(InputValue::whole_number);
    let monthly_payment = supplied(&spec.monthly_payment).map(InputValue::currency);
    if term_years == Some(0) {
        return Err(LoanError::InvalidTerm);
    }
    if matches!(monthly_payment, Some(payment) if payment <= 0. || !payment.is_finite()) {
        return Err(LoanError::InvalidMonthlyPayment);
    }
    let basis = match (term_years, monthly_payment) {
        (Some(years), _) => PaymentBasis::Term { years },
        (None, Some(payment)) => PaymentBasis::Fixed { payment },
        (None, None) => return Err(LoanError::MissingPaymentBasis),
    };

    let mut extra_payment = spec
        .extra_monthly_payment
        .as_ref()
        .map(InputValue::currency)
        .unwrap_or(0.);
    if extra_payment < 0. {
        warn!("ignoring negative extra payment {}", extra_payment);
        extra_payment = 0.;
    }

    Ok(LoanTerms {
        principal,
        annual_rate,
        basis,
        extra_payment,
        first_payment_date: spec.first_payment_date,
    })
}

// blank text counts as not supplied, like an empty form field
fn supplied(field: &Option<InputValue>) -> Option<&InputValue> {
    field.as_ref().filter(|value| !value.is_blank())
}

pub fn get_pmt_amount(terms: &LoanTerms) -> Result<f64, LoanError> {
    let rate = terms.monthly_rate();

    let pmt_amount = match terms.basis {
        PaymentBasis::Term { years } => {
            let total_pmts = f64::from(years) * 12.;
            if rate == 0. {
                terms.principal / total_pmts
            } else {
                terms.principal * (rate / (1. - (1. + rate).powf(-total_pmts)))
            }
        }
        PaymentBasis::Fixed { payment } => payment,
    };

    if !pmt_amount.is_finite() || pmt_amount <= terms.principal * rate {
        return Err(LoanError::PaymentTooLow);
    }
    Ok(pmt_amount)
}

// Walks the balance down month by month. Returns the rounded entries and the
// unrounded interest total.
fn scheduled_months(
    terms: &LoanTerms,
    pmt_amount: f64,
) -> Result<(Vec<MonthEntry>, f64), LoanError> {
    let rate = terms.monthly_rate();
    let mut loan_months = Vec::new();
    let mut begin_balance = terms.principal;
    let mut extra = terms.extra_payment;
    let mut total_interest = 0.;

    for month_number in 1..=MAX_MONTHS {
        let interest = begin_balance * rate;
        let mut principal_paid = pmt_amount - interest;

        // final payment: pay off what is left and nothing more
        if begin_balance < principal_paid + extra {
            principal_paid = begin_balance;
            extra = 0.;
        }

        let mut end_balance = (begin_balance - principal_paid - extra).max(0.);
        // a sub-cent remainder is float noise, not another month of debt
        if end_balance > 0. && round_cents(end_balance) == 0. {
            principal_paid += end_balance;
            end_balance = 0.;
        }
        trace!(
            "month {}, begin bal {}, interest {}, principal {}, end bal {}",
            month_number,
            begin_balance,
            interest,
            principal_paid + extra,
            end_balance
        );

        loan_months.push(MonthEntry::new(
            month_number,
            get_pmt_date(terms.first_payment_date, month_number),
            begin_balance,
            interest,
            principal_paid + extra,
            end_balance,
        ));
        total_interest += interest;

        if end_balance <= 0. {
            return Ok((loan_months, total_interest));
        }
        begin_balance = end_balance;
    }

    warn!("balance still {} after {} months", begin_balance, MAX_MONTHS);
    Err(LoanError::ExceedsMaximumTerm)
}

// Month n falls n-1 months after the first payment. Counting from the first
// date keeps end-of-month dates from drifting (Jan 31 -> Feb 29 -> Mar 31).
fn get_pmt_date(first_payment_date: Option<NaiveDate>, month_number: u32) -> Option<NaiveDate> {
    first_payment_date
        .and_then(|first| first.checked_add_months(Months::new(month_number - 1)))
}

pub fn payoff_message(total_months: usize) -> String {
    if total_months >= 12 {
        let years = total_months / 12;
        let months = total_months % 12;
        if months == 0 {
            format!("Loan paid off in {}.", plural(years, "year"))
        } else {
            format!(
                "Loan paid off in {} and {}.",
                plural(years, "year"),
                plural(months, "month")
            )
        }
    } else {
        format!("Loan paid off in {}.", plural(total_months, "month"))
    }
}

fn plural(count: usize, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
