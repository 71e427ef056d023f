use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_calc_schedule() {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args(["calc", "-p", "$100,000", "-r", "1.99%", "-t", "30 years"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "month 1, starting principal $100000.00, interest $165.83, principal $203.29, ending principal $99796.71",
        ))
        .stdout(predicate::str::contains("month 360,"))
        .stdout(predicate::str::contains("month 361,").not())
        .stdout(predicate::str::contains(
            "Loan paid off in 30 years. Monthly payment $369.12, total interest paid $32883.06.",
        ));
}

#[test]
fn test_calc_summary_with_dates() {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args([
        "calc",
        "--principal",
        "10000",
        "--rate",
        "5",
        "--monthly-payment",
        "2000",
        "--first-payment",
        "2024-01-31",
        "--summary",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("month 1,").not())
        .stdout(predicate::str::contains(
            "Loan paid off in 6 months. Monthly payment $2000.00, total interest paid $126.92.",
        ))
        .stdout(predicate::str::contains("Final payment on 2024-06-30."));
}

#[test]
fn test_calc_extra_payment() {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args([
        "calc",
        "-p",
        "100000",
        "-r",
        "1.99",
        "-t",
        "30",
        "-e",
        "100",
        "--summary",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total interest paid $23491.83."));
}

#[test]
fn test_calc_reports_invalid_loan() {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args(["calc", "-p", "100000", "-r", "1.99"]);

    cmd.assert().failure().stdout(predicate::str::contains(
        "Error: Either term years or monthly payment must be provided",
    ));

    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args(["calc", "-p", "100000", "-r", "6", "-m", "400"]);

    cmd.assert().failure().stdout(predicate::str::contains(
        "Error: Monthly payment is too low to cover interest. Loan will never be paid off.",
    ));
}

#[test]
fn test_calc_rejects_bad_date() {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args([
        "calc",
        "-p",
        "1000",
        "-r",
        "5",
        "-t",
        "1",
        "--first-payment",
        "tomorrow",
    ]);

    cmd.assert().failure();
}

#[test]
fn test_batch_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args(["batch", "tests/fixtures/loans.csv"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "house: Loan paid off in 30 years. Monthly payment $369.12, total interest paid $32883.06.",
        ))
        .stdout(predicate::str::contains(
            "house extra: Loan paid off in 22 years. Monthly payment $369.12, total interest paid $23491.83.",
        ))
        .stdout(predicate::str::contains(
            "car: Loan paid off in 6 months. Monthly payment $2000.00, total interest paid $126.92.",
        ))
        .stdout(predicate::str::contains(
            "cheap: Error: Monthly payment is too low to cover interest.",
        ))
        .stderr(predicate::str::contains(
            "Error reading loan record: loan record 4 has no name",
        ));

    Ok(())
}

#[test]
fn test_batch_missing_file() {
    let mut cmd = Command::new(cargo_bin!("amortize"));
    cmd.args(["batch", "tests/fixtures/does_not_exist.csv"]);

    cmd.assert().failure();
}
