//! Subcommand behavior against a temporary measurement directory and
//! config file.

use std::fs;
use std::path::Path;

use bbm_analysis::Selection;
use bbm_cli::check::{evaluate_directory, CheckArgs};
use bbm_cli::config::{ConfigError, Settings};
use bbm_cli::selection::SelectionArgs;
use bbm_cli::stats::{compute_stats, StatsArgs};
use bbm_cli::output::{render_verdict, OutputFormat};
use bbm_compliance::Outcome;
use bbm_core::{MeasuredAt, Metric};
use bbm_store::RecordStore;
use chrono::NaiveDate;

const HEADER: &str = "\"Messzeitpunkt\";\"Uhrzeit\";\"Download (Mbit/s)\";\"Upload (Mbit/s)\";\"Laufzeit (ms)\";\"Test-ID\";\"Version\";\"Betriebssystem\";\"Internet-Browser\"";

const TIMES: [&str; 10] = [
    "08:00:00", "08:30:00", "09:00:00", "09:30:00", "10:00:00", "14:00:00", "14:30:00", "15:00:00",
    "15:30:00", "16:00:00",
];

/// One export per day with ten well-spaced measurements.
fn write_day(dir: &Path, day: u32, download: &str) {
    let mut body = vec![HEADER.to_string()];
    for (i, time) in TIMES.iter().enumerate() {
        body.push(format!(
            "\"{day:02}.03.2025\";\"{time}\";\"{download}\";\"42,5\";\"17\";\"t{day}-{i}\";\"3.4.0\";\"Linux\";\"Firefox\""
        ));
    }
    fs::write(
        dir.join(format!("Breitbandmessung_{day:02}_03_2025_08_00_00.csv")),
        body.join("\n"),
    )
    .unwrap();
}

fn write_config(dir: &Path, data: &Path) -> std::path::PathBuf {
    let path = dir.join("bbm.yaml");
    fs::write(
        &path,
        format!(
            "data:\n  measurements_path: {}\ncontract:\n  download: {{ minimum_mbps: 150, normal_mbps: 210, maximum_mbps: 250 }}\n  upload: {{ minimum_mbps: 15, normal_mbps: 30, maximum_mbps: 50 }}\n",
            data.display()
        ),
    )
    .unwrap();
    path
}

fn now() -> MeasuredAt {
    MeasuredAt::parse_iso("2025-03-20T12:00:00").unwrap()
}

#[test]
fn check_passes_over_three_good_days() {
    let data = tempfile::tempdir().unwrap();
    for day in [3, 5, 7] {
        write_day(data.path(), day, "231,7");
    }
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path(), data.path());
    let settings = Settings::load(Some(&config), cfg_dir.path()).unwrap();

    let verdict = evaluate_directory(&CheckArgs::default(), &settings, &RecordStore::new(), now())
        .unwrap()
        .verdict
        .unwrap();
    assert_eq!(verdict.validity.total_records, 30);
    assert_eq!(verdict.validity.distinct_days, 3);
    assert_eq!(verdict.outcome, Outcome::Pass);
    assert!(verdict.spacing_warnings.is_empty());
}

#[test]
fn flags_override_config_contract() {
    let data = tempfile::tempdir().unwrap();
    for day in [3, 5, 7] {
        write_day(data.path(), day, "231,7");
    }
    let cfg_dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(Some(&write_config(cfg_dir.path(), data.path())), cfg_dir.path()).unwrap();
    let args = CheckArgs {
        download_min: Some(240.0),
        download_normal: Some(260.0),
        download_max: Some(300.0),
        ..CheckArgs::default()
    };
    let verdict = evaluate_directory(&args, &settings, &RecordStore::new(), now())
        .unwrap()
        .verdict
        .unwrap();
    assert_eq!(verdict.download.outcome, Outcome::Fail);
    assert_eq!(verdict.outcome, Outcome::Fail);
}

#[test]
fn protocol_selection_picks_thirty() {
    let data = tempfile::tempdir().unwrap();
    for day in [3, 4, 6, 8] {
        write_day(data.path(), day, "231,7");
    }
    let cfg_dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(Some(&write_config(cfg_dir.path(), data.path())), cfg_dir.path()).unwrap();
    let args = CheckArgs {
        protocol: true,
        ..CheckArgs::default()
    };
    let verdict = evaluate_directory(&args, &settings, &RecordStore::new(), now())
        .unwrap()
        .verdict
        .unwrap();
    assert_eq!(verdict.validity.total_records, 30);
    let days: Vec<NaiveDate> = verdict.daily[0].days.iter().map(|d| d.date).collect();
    assert_eq!(
        days,
        vec![
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
        ]
    );
}

#[test]
fn protocol_without_candidate_days_is_none() {
    let data = tempfile::tempdir().unwrap();
    write_day(data.path(), 3, "231,7");
    write_day(data.path(), 4, "231,7");
    let cfg_dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(Some(&write_config(cfg_dir.path(), data.path())), cfg_dir.path()).unwrap();
    let args = CheckArgs {
        protocol: true,
        ..CheckArgs::default()
    };
    assert!(evaluate_directory(&args, &settings, &RecordStore::new(), now())
        .unwrap()
        .verdict
        .is_none());
}

#[test]
fn missing_contract_is_an_error() {
    let data = tempfile::tempdir().unwrap();
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let err = evaluate_directory(&CheckArgs::default(), &settings, &RecordStore::new(), now())
        .unwrap_err();
    assert!(err.downcast_ref::<ConfigError>().is_some());
}

#[test]
fn inconsistent_contract_is_an_error() {
    let data = tempfile::tempdir().unwrap();
    write_day(data.path(), 3, "100");
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let args = CheckArgs {
        download_min: Some(100.0),
        download_normal: Some(50.0),
        upload_min: Some(10.0),
        upload_normal: Some(20.0),
        ..CheckArgs::default()
    };
    let err = evaluate_directory(&args, &settings, &RecordStore::new(), now()).unwrap_err();
    assert!(format!("{err:#}").contains("exceeds normal speed"));
}

#[test]
fn stats_respect_selection_and_metrics() {
    let data = tempfile::tempdir().unwrap();
    write_day(data.path(), 3, "100");
    write_day(data.path(), 5, "200");
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let args = StatsArgs {
        selection: SelectionArgs {
            from: NaiveDate::from_ymd_opt(2025, 3, 5),
            ..SelectionArgs::default()
        },
        metrics: vec![Metric::Download],
        format: OutputFormat::Text,
    };
    let report = compute_stats(&args, &settings, &RecordStore::new(), now()).unwrap();
    assert_eq!(report.selected, 10);
    assert_eq!(report.statistics.len(), 1);
    assert_eq!(report.statistics.get(Metric::Download).unwrap().mean, Some(200.0));
}

#[test]
fn stats_default_to_every_metric() {
    let data = tempfile::tempdir().unwrap();
    write_day(data.path(), 3, "100");
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let args = StatsArgs {
        selection: SelectionArgs::default(),
        metrics: vec![],
        format: OutputFormat::Json,
    };
    let report = compute_stats(&args, &settings, &RecordStore::new(), now()).unwrap();
    assert_eq!(report.statistics.len(), 3);
    assert_eq!(report.statistics.get(Metric::Latency).unwrap().min, Some(17.0));
}

#[test]
fn implicit_config_file_is_picked_up() {
    let cfg_dir = tempfile::tempdir().unwrap();
    fs::write(
        cfg_dir.path().join("config.yaml"),
        "data:\n  measurements_path: /srv/bbm\n",
    )
    .unwrap();
    let settings = Settings::load(None, cfg_dir.path()).unwrap();
    assert_eq!(settings.data.measurements_path, Path::new("/srv/bbm"));

    let empty = tempfile::tempdir().unwrap();
    assert_eq!(Settings::load(None, empty.path()).unwrap(), Settings::default());
}

#[test]
fn explicit_missing_config_is_read_error() {
    let err = Settings::load(Some(Path::new("/no/such/bbm.yaml")), Path::new(".")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn selection_args_map_to_date_range() {
    let args = SelectionArgs {
        to: NaiveDate::from_ymd_opt(2025, 3, 4),
        ..SelectionArgs::default()
    };
    assert!(matches!(
        args.selections(now()).unwrap()[0],
        Selection::DateRange { .. }
    ));
}

#[test]
fn check_reports_skipped_rows_next_to_verdict() {
    let data = tempfile::tempdir().unwrap();
    for day in [3, 5, 7] {
        write_day(data.path(), day, "231,7");
    }
    let day3 = data.path().join("Breitbandmessung_03_03_2025_08_00_00.csv");
    let mut text = fs::read_to_string(&day3).unwrap();
    text.push_str("\n\"03.03.2025\";\"17:00:00\";\"schnell\";\"42,5\";\"17\";\"bad\";\"3.4.0\";\"Linux\";\"Firefox\"");
    fs::write(&day3, text).unwrap();
    fs::write(data.path().join("Breitbandmessung_09_03_2025.csv"), "date;time\n").unwrap();

    let cfg_dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(Some(&write_config(cfg_dir.path(), data.path())), cfg_dir.path()).unwrap();
    let report = evaluate_directory(&CheckArgs::default(), &settings, &RecordStore::new(), now()).unwrap();

    assert_eq!(report.issues.skipped_rows.len(), 1);
    assert_eq!(report.issues.skipped_rows[0].row.line, 12);
    assert_eq!(report.issues.rejected_files.len(), 1);

    let verdict = report.verdict.as_ref().unwrap();
    assert_eq!(verdict.validity.total_records, 30);
    let rendered = render_verdict(verdict, &report.issues, OutputFormat::Text).unwrap();
    assert!(rendered.contains("Breitbandmessung_03_03_2025_08_00_00.csv line 12:"));
    assert!(rendered.contains("FAIL Breitbandmessung_09_03_2025.csv"));
}

#[test]
fn stats_carry_load_issues() {
    let data = tempfile::tempdir().unwrap();
    fs::write(
        data.path().join("Breitbandmessung_03_03_2025.csv"),
        format!("{HEADER}\n\"03.03.2025\";\"08:00:00\";\"1,0\";\"1,0\";\"x\";\"t\";\"\";\"\";\"\""),
    )
    .unwrap();
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let args = StatsArgs {
        selection: SelectionArgs::default(),
        metrics: vec![],
        format: OutputFormat::Text,
    };
    let report = compute_stats(&args, &settings, &RecordStore::new(), now()).unwrap();
    assert_eq!(report.selected, 0);
    assert_eq!(report.issues.skipped_rows[0].row.line, 2);
}

#[test]
fn last_days_at_its_maximum_selects_everything() {
    let data = tempfile::tempdir().unwrap();
    write_day(data.path(), 3, "100");
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let args = StatsArgs {
        selection: SelectionArgs {
            last_days: Some(u32::MAX),
            ..SelectionArgs::default()
        },
        metrics: vec![Metric::Download],
        format: OutputFormat::Text,
    };
    let report = compute_stats(&args, &settings, &RecordStore::new(), now()).unwrap();
    assert_eq!(report.selected, 10);
}

#[test]
fn last_days_zero_keeps_only_now_onwards() {
    let data = tempfile::tempdir().unwrap();
    write_day(data.path(), 3, "100");
    let settings = Settings::default().with_data_path(Some(data.path().to_path_buf()));
    let args = StatsArgs {
        selection: SelectionArgs {
            last_days: Some(0),
            ..SelectionArgs::default()
        },
        metrics: vec![],
        format: OutputFormat::Json,
    };
    let report = compute_stats(&args, &settings, &RecordStore::new(), now()).unwrap();
    assert_eq!(report.selected, 0);
}

#[test]
fn oversized_spacing_config_is_a_config_error() {
    let data = tempfile::tempdir().unwrap();
    for day in [3, 5, 7] {
        write_day(data.path(), day, "231,7");
    }
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path(), data.path());
    let mut yaml = fs::read_to_string(&config).unwrap();
    yaml.push_str("methodology:\n  spacing:\n    min_spacing_minutes: 9223372036854775807\n");
    fs::write(&config, yaml).unwrap();

    let settings = Settings::load(Some(&config), cfg_dir.path()).unwrap();
    let err = evaluate_directory(&CheckArgs::default(), &settings, &RecordStore::new(), now())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<bbm_compliance::ConfigError>(),
        Some(bbm_compliance::ConfigError::SpacingOutOfRange { field: "min_spacing_minutes", .. })
    ));
}

#[test]
fn overflowing_campaign_config_is_a_config_error() {
    let data = tempfile::tempdir().unwrap();
    let cfg_dir = tempfile::tempdir().unwrap();
    let config = write_config(cfg_dir.path(), data.path());
    let mut yaml = fs::read_to_string(&config).unwrap();
    yaml.push_str("methodology:\n  spacing:\n    days: 18446744073709551615\n    per_day: 2\n");
    fs::write(&config, yaml).unwrap();

    let settings = Settings::load(Some(&config), cfg_dir.path()).unwrap();
    let args = CheckArgs {
        protocol: true,
        ..CheckArgs::default()
    };
    let err = evaluate_directory(&args, &settings, &RecordStore::new(), now()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<bbm_compliance::ConfigError>(),
        Some(bbm_compliance::ConfigError::CampaignTooLarge { per_day: 2, .. })
    ));
}
