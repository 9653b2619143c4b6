use std::process::{Command, Output};

const VOLTAGE_DEVICE: &str = "USB Audio (485B39 212345602560000256000220615)";
const BAD_FORMAT_DEVICE: &str = "USB Audio (485B39 912345602560000256000220615)";

fn combined_output(output: &Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn digidaq_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_digidaq").expect("digidaq test binary not built")
}

fn with_fixture(devices: &str, args: &[&str]) -> Output {
    Command::new(digidaq_bin())
        .args(args)
        .env("DIGIDAQ_TEST_DEVICES", devices)
        .env("DIGIDAQ_TEST_HOST_APIS", "Fixture;Other")
        .env_remove("DIGIDAQ_HOST_API")
        .env_remove("DIGIDAQ_LOGS")
        .env_remove("DIGIDAQ_NO_LOGS")
        .output()
        .expect("run digidaq")
}

#[test]
fn digidaq_help_mentions_name() {
    let output = Command::new(digidaq_bin())
        .arg("--help")
        .output()
        .expect("run digidaq --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("DigiDAQ"));
}

#[test]
fn list_devices_prints_decoded_table_and_skips_bad_entries() {
    let devices = format!("0:Built-in Microphone;0:{BAD_FORMAT_DEVICE};0:{VOLTAGE_DEVICE}");
    let output = with_fixture(&devices, &["--list-devices"]);
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Compatible devices:"));
    assert!(stdout.contains("485B39"));
    assert!(stdout.contains("2022-06-15"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized format code"), "{stderr}");
}

#[test]
fn list_devices_json_reports_enumeration_index() {
    let devices = format!("0:Built-in Microphone;1:{VOLTAGE_DEVICE};0:{VOLTAGE_DEVICE}");
    let output = with_fixture(&devices, &["--list-devices", "--json", "--no-logs"]);
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let list = parsed.as_array().expect("device array");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["device_index"], 2);
    assert_eq!(list[0]["format"], "voltage");
    assert_eq!(list[0]["sensitivity_raw"][0], 256_000);
    assert_eq!(list[0]["calibration_date"], "2022-06-15");
}

#[test]
fn list_devices_honors_host_api_override() {
    let devices = format!("0:Built-in Microphone;1:{VOLTAGE_DEVICE}");
    let output = with_fixture(
        &devices,
        &["--list-devices", "--json", "--no-logs", "--host-api", "Other"],
    );
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed[0]["device_index"], 1);
}

#[test]
fn list_devices_without_matches_says_so() {
    let output = with_fixture("0:Built-in Microphone;0:HDMI", &["--list-devices"]);
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("No compatible devices found"));
}

#[test]
fn capture_without_devices_fails() {
    let output = with_fixture("0:Built-in Microphone", &["--no-logs"]);
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("no compatible devices found"));
}

#[test]
fn capture_refuses_fixture_devices() {
    let output = with_fixture(&format!("0:{VOLTAGE_DEVICE}"), &["--no-logs"]);
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("real hardware"));
}

#[test]
fn invalid_sample_rate_is_rejected() {
    let output = with_fixture(
        &format!("0:{VOLTAGE_DEVICE}"),
        &["--list-devices", "--sample-rate", "12345"],
    );
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--sample-rate"));
}

#[test]
fn skipped_devices_are_reported_without_logging() {
    let devices = format!("0:{BAD_FORMAT_DEVICE};0:{VOLTAGE_DEVICE}");
    let output = with_fixture(&devices, &["--list-devices", "--json", "--no-logs"]);
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed[0]["device_index"], 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipped device 0"), "{stderr}");
    assert!(stderr.contains("unrecognized format code '9'"), "{stderr}");
}
