use thiserror::Error;

// Display text is the user-facing message after "Error: "
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LoanError {
    #[error("Principal amount must be greater than 0")]
    InvalidPrincipal,
    #[error("Interest rate must be a number and cannot be negative")]
    InvalidRate,
    #[error("Either term years or monthly payment must be provided")]
    MissingPaymentBasis,
    #[error("Term years must be greater than 0")]
    InvalidTerm,
    #[error("Monthly payment must be greater than 0")]
    InvalidMonthlyPayment,
    #[error("Monthly payment is too low to cover interest. Loan will never be paid off.")]
    PaymentTooLow,
    #[error("Loan term exceeds maximum calculation limit.")]
    ExceedsMaximumTerm,
}

#[cfg(feature = "serde")]
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("loan record {row} has no name")]
    MissingName { row: usize },
}
