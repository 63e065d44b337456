use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "budget-planner";
const DEMO: &str = "Main Budget Plan";

fn planner_command(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).unwrap();
    cmd.env("BUDGET_PLANNER_DATA_DIR", data_dir.path());
    cmd.env_remove("BUDGET_PLANNER_LOG");
    cmd
}

fn run(data_dir: &TempDir, args: &[&str]) {
    planner_command(data_dir).args(args).assert().success();
}

fn totals_json(data_dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = planner_command(data_dir)
        .arg("totals")
        .args(args)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn init_creates_data_files() {
    let data_dir = TempDir::new().unwrap();
    planner_command(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete"));

    assert!(data_dir.path().join("data").join("planners.json").exists());
    assert!(data_dir.path().join("data").join("bills.json").exists());
    assert!(data_dir.path().join("config.json").exists());
}

#[test]
fn seeded_planner_totals() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["seed"]);

    let totals = totals_json(&data_dir, &[DEMO]);
    assert_eq!(totals["monthlyIncome"], 400_000);
    assert_eq!(totals["monthlyExpenses"], 80_000);
    assert_eq!(totals["monthlyBills"], 53_000);
    assert_eq!(totals["monthlyLiabilities"], 150_000);
    assert_eq!(totals["totalMonthlyOutgoings"], 283_000);
    assert_eq!(totals["netCashFlow"], 117_000);
    assert_eq!(totals["assetSales"], 26_500_000);
}

#[test]
fn manual_planner_net_cash_flow() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["planner", "create", "Household"]);
    run(&data_dir, &["income", "-p", "Household", "add", "Salary", "4000"]);
    run(&data_dir, &["expense", "-p", "Household", "add", "Groceries", "600"]);
    run(&data_dir, &["bill", "-p", "Household", "add", "Insurance", "1200", "--interval", "12"]);

    let totals = totals_json(&data_dir, &["Household"]);
    assert_eq!(totals["monthlyBills"], 10_000);
    assert_eq!(totals["netCashFlow"], 330_000);
}

#[test]
fn switching_off_an_asset_switches_off_dependents() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["seed"]);
    run(&data_dir, &["asset", "-p", DEMO, "toggle", "Family House", "off"]);

    let totals = totals_json(&data_dir, &[DEMO]);
    assert_eq!(totals["monthlyLiabilities"], 30_000);
    assert_eq!(totals["monthlyBills"], 8_000);

    // the mortgage keeps its own toggle but resolves to off
    planner_command(&data_dir)
        .args(["status", DEMO, "liability", "--json"])
        .assert()
        .success()
        .stdout(contains("\"includeToggle\": \"on\""))
        .stdout(contains("\"effectiveStatus\": \"off\""));
}

#[test]
fn scenario_selector_filters_items() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["planner", "create", "Household"]);
    run(&data_dir, &["scenario", "-p", "Household", "add", "A", "Rent out the flat"]);
    run(&data_dir, &["scenario", "-p", "Household", "add", "B", "Take the bonus"]);
    run(&data_dir, &["income", "-p", "Household", "add", "Salary", "4000"]);
    run(&data_dir, &["income", "-p", "Household", "add", "Rent", "900", "--scenario", "A"]);
    run(&data_dir, &["income", "-p", "Household", "add", "Bonus", "300", "--scenario", "B"]);

    // ALL browses every item whatever its tag
    let everything = totals_json(&data_dir, &["Household"]);
    assert_eq!(everything["monthlyIncome"], 520_000);

    // a named selector sees its own items plus the ALL baseline
    let rent = totals_json(&data_dir, &["Household", "--scenario", "A"]);
    assert_eq!(rent["monthlyIncome"], 490_000);
    let bonus = totals_json(&data_dir, &["Household", "--scenario", "b"]);
    assert_eq!(bonus["monthlyIncome"], 430_000);
}

#[test]
fn unknown_scenario_tag_is_rejected() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["planner", "create", "Household"]);
    planner_command(&data_dir)
        .args(["income", "-p", "Household", "add", "Rent", "900", "--scenario", "Z"])
        .assert()
        .failure()
        .stderr(contains("not defined"));
}

#[test]
fn amounts_above_the_limit_are_rejected() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["planner", "create", "Household"]);
    planner_command(&data_dir)
        .args(["bill", "-p", "Household", "add", "Insurance", "50000000000000000"])
        .assert()
        .failure()
        .stderr(contains("exceeds 999999999999.99"));

    run(&data_dir, &["bill", "-p", "Household", "add", "Insurance", "999999999999.99"]);
    let totals = totals_json(&data_dir, &["Household"]);
    assert_eq!(totals["monthlyBills"], 99_999_999_999_999_i64);
}

#[test]
fn unknown_planner_fails() {
    let data_dir = TempDir::new().unwrap();
    planner_command(&data_dir)
        .args(["totals", "Nowhere"])
        .assert()
        .failure()
        .stderr(contains("Planner not found"));
}

#[test]
fn totals_export_csv() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["seed"]);
    let csv_path = data_dir.path().join("cash_flow.csv");

    planner_command(&data_dir)
        .args(["totals", DEMO, "--output"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("exported"));

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("Kind,Name,Scenario"));
    assert!(csv.contains("SUMMARY,Net Cash Flow,ALL,,,1170.00"));
}

#[test]
fn terminal_report_and_listing() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["seed"]);

    planner_command(&data_dir)
        .args(["totals", DEMO])
        .assert()
        .success()
        .stdout(contains("Cash Flow: Main Budget Plan"))
        .stdout(contains("€1170.00"));

    // seed makes the demo planner the default
    planner_command(&data_dir)
        .args(["bill", "list"])
        .assert()
        .success()
        .stdout(contains("Home Insurance").and(contains("€100.00")));
}

#[test]
fn logs_go_to_stderr() {
    let data_dir = TempDir::new().unwrap();
    run(&data_dir, &["seed"]);

    let output = planner_command(&data_dir)
        .env("BUDGET_PLANNER_LOG", "budget_planner=debug")
        .args(["totals", DEMO, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fetched items"));
    let totals: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(totals["netCashFlow"], 117_000);
}
