use std::fmt;

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl Default for InputValue {
    fn default() -> Self {
        InputValue::Text(String::new())
    }
}

impl From<&str> for InputValue {
    fn from(text: &str) -> Self {
        InputValue::Text(text.to_string())
    }
}

impl From<String> for InputValue {
    fn from(text: String) -> Self {
        InputValue::Text(text)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<u32> for InputValue {
    fn from(value: u32) -> Self {
        InputValue::Number(value.into())
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Number(value) => write!(f, "{}", value),
            InputValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl InputValue {
    pub fn is_blank(&self) -> bool {
        match self {
            InputValue::Number(_) => false,
            InputValue::Text(text) => text.trim().is_empty(),
        }
    }

    // Numbers go through their own shortest decimal rendering so both kinds of
    // input share one set of parsing rules.
    pub fn currency(&self) -> f64 {
        parse_currency(&self.to_string())
    }

    pub fn rate_percent(&self) -> f64 {
        self.try_rate_percent().unwrap_or(0.)
    }

    // None when there is no number at all, so "0" and "abc" can be told apart
    pub fn try_rate_percent(&self) -> Option<f64> {
        leading_decimal(&strip_rate(&self.to_string()))
            .map(as_percent)
    }

    pub fn whole_number(&self) -> u32 {
        parse_whole_number(&self.to_string())
    }
}

pub fn round_cents(amt: f64) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 100.).round() / 100.
    }
}

pub fn parse_currency(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    leading_decimal(&cleaned)
        .map(round_cents)
        .filter(|value| value.is_finite())
        .unwrap_or(0.)
}

/// Parses an annual rate into percent.
///
/// Values above 1 are taken as already being a percentage (`"2.99"`), values
/// of 1 or less as a fraction (`"0.0299"`). A genuine rate below 1% written as
/// `"0.5"` is therefore read as 50%.
pub fn parse_rate_percent(text: &str) -> f64 {
    leading_decimal(&strip_rate(text))
        .map(as_percent)
        .unwrap_or(0.)
}

// "30 years" -> 30, fractions truncated
pub fn parse_whole_number(text: &str) -> u32 {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .take_while(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}

fn strip_rate(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect()
}

fn as_percent(rate: f64) -> f64 {
    if rate > 1. {
        rate
    } else {
        rate * 100.
    }
}

// Reads the longest decimal prefix (sign, digits, fraction, exponent) and
// ignores whatever trails it.
fn leading_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes
            .get(start..)
            .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
            .unwrap_or(0)
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_from(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
