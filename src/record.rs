use crate::error::RecordError;
use crate::loan::LoanSpec;
use crate::parse::InputValue;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub name: String,
    pub principal: InputValue,
    pub rate: InputValue,
    #[serde(default)]
    pub term_years: Option<InputValue>,
    #[serde(default)]
    pub monthly_payment: Option<InputValue>,
    #[serde(default, alias = "extraPrincipalPayment")]
    pub extra_monthly_payment: Option<InputValue>,
}

impl LoanRecord {
    pub fn check(&self, row: usize) -> Result<(), RecordError> {
        if self.name.trim().is_empty() {
            return Err(RecordError::MissingName { row });
        }
        Ok(())
    }
}

impl From<LoanRecord> for LoanSpec {
    fn from(record: LoanRecord) -> Self {
        Self {
            principal: record.principal,
            rate: record.rate,
            term_years: record.term_years,
            monthly_payment: record.monthly_payment,
            extra_monthly_payment: record.extra_monthly_payment,
            first_payment_date: None,
        }
    }
}

// Rows are deserialized lazily. A bad row yields an error without ending the
// stream.
pub struct RecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn records(self) -> impl Iterator<Item = Result<LoanRecord, RecordError>> {
        self.reader
            .into_deserialize::<LoanRecord>()
            .enumerate()
            .map(|(index, result)| {
                let record = result?;
                record.check(index + 1)?;
                Ok(record)
            })
    }
}
