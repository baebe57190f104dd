use battery_health_lib::report::{parse_document, DESIGN_CAPACITY, FULL_CHARGE_CAPACITY};
use battery_health_lib::{
    calculate_health, check_document, parse_batteries, parse_report, HealthStatus, ParseError,
};

const SINGLE: &str = include_str!("fixtures/battery_report.html");
const MULTI: &str = include_str!("fixtures/multi_battery_report.html");
const MISSING: &str = include_str!("fixtures/missing_full_charge.html");

#[test]
fn test_sample_report_capacities() {
    let report = parse_report(SINGLE).unwrap();
    assert_eq!(report.design_capacity_mwh, 60_001);
    assert_eq!(report.full_charge_capacity_mwh, 47_952);
}

#[test]
fn test_sample_report_details() {
    let details = parse_report(SINGLE).unwrap().details;
    assert_eq!(details.name.as_deref(), Some("DELL 0KG6K05"));
    assert_eq!(details.manufacturer.as_deref(), Some("SMP"));
    assert_eq!(details.serial_number.as_deref(), Some("1337"));
    assert_eq!(details.chemistry.as_deref(), Some("LiP"));
    assert_eq!(details.cycle_count, Some(312));
}

#[test]
fn test_sample_report_metadata() {
    let parsed = parse_document(SINGLE).unwrap();
    let meta = parsed.metadata;
    assert_eq!(meta.computer_name.as_deref(), Some("WORKSTATION-7"));
    assert_eq!(meta.system_product_name.as_deref(), Some("Dell Inc. Latitude 7490"));
    assert_eq!(meta.report_time.as_deref(), Some("2024-03-07 09:14:52"));
    assert!(meta.os_build.unwrap().starts_with("22621"));
}

#[test]
fn test_capacity_history_is_not_a_battery() {
    assert_eq!(parse_batteries(SINGLE).unwrap().len(), 1);
}

#[test]
fn test_sample_report_health() {
    let health = calculate_health(&parse_report(SINGLE).unwrap()).unwrap();
    assert_eq!(health.percentage, 80);
    assert_eq!(health.status, HealthStatus::Good);
}

#[test]
fn test_multi_battery_report() {
    let batteries: Vec<_> = parse_batteries(MULTI)
        .unwrap()
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(batteries.len(), 2);
    assert_eq!(batteries[0].details.name.as_deref(), Some("01AV421"));
    assert_eq!(batteries[1].details.manufacturer.as_deref(), Some("Celxpert"));
    assert_eq!(batteries[1].details.cycle_count, None);

    let first = calculate_health(&batteries[0]).unwrap();
    assert_eq!(first.percentage, 91);
    assert_eq!(first.status, HealthStatus::Excellent);

    // 28,440 / 72,000 is exactly 39.5%
    let second = calculate_health(&batteries[1]).unwrap();
    assert_eq!(second.percentage, 40);
    assert_eq!(second.status, HealthStatus::Poor);
}

#[test]
fn test_select_second_battery() {
    let check = check_document(MULTI, 1).unwrap();
    assert_eq!(check.battery_count, 2);
    assert_eq!(check.battery.design_capacity_mwh, 72_000);
    assert_eq!(check.metadata.computer_name.as_deref(), Some("THINKPAD-T480"));
}

#[test]
fn test_missing_full_charge_is_parse_error() {
    assert_eq!(
        parse_report(MISSING).unwrap_err(),
        ParseError::MissingField(FULL_CHARGE_CAPACITY)
    );
}

#[test]
fn test_unrelated_html_is_parse_error() {
    let doc = "<html><body><table><tr><td>Hello</td><td>World</td></tr></table></body></html>";
    assert_eq!(
        parse_report(doc).unwrap_err(),
        ParseError::MissingField(DESIGN_CAPACITY)
    );
}

#[test]
fn test_report_with_dash_capacity() {
    let doc = SINGLE.replace("47,952 mWh", "-");
    assert!(matches!(
        parse_report(&doc).unwrap_err(),
        ParseError::InvalidValue { field, .. } if field == FULL_CHARGE_CAPACITY
    ));
}
