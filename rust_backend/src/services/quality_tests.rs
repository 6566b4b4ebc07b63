#[cfg(test)]
mod tests {
    use crate::algorithms::RowRun;
    use crate::config::QualitySettings;
    use crate::core::domain::{cell, DataBlock, PointLabel};
    use crate::error::CheckError;
    use crate::services::quality::{analyze_quality, coerce_numeric};

    fn label(name: &str) -> PointLabel {
        PointLabel {
            canonical_id: name.to_string(),
            display_label: name.to_string(),
        }
    }

    fn block(columns: Vec<(&str, Vec<&str>)>) -> DataBlock {
        let height = columns.first().map_or(0, |c| c.1.len());
        DataBlock {
            datetime_label: "Datetime".to_string(),
            timestamps: (0..height).map(|i| cell(&format!("row {}", i))).collect(),
            columns: columns.iter().map(|c| label(c.0)).collect(),
            values: columns
                .iter()
                .map(|c| c.1.iter().map(|v| cell(v)).collect())
                .collect(),
        }
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric(&cell("3.5")), Some(3.5));
        assert_eq!(coerce_numeric(&cell(" -2e3 ")), Some(-2000.0));
        assert_eq!(coerce_numeric(&cell("Bad")), None);
        assert_eq!(coerce_numeric(&cell("1,234")), None);
        assert_eq!(coerce_numeric(&cell("NaN")), None);
        assert_eq!(coerce_numeric(&None), None);
    }

    #[test]
    fn test_three_of_ten_missing_is_thirty_percent() {
        let data = block(vec![(
            "A",
            vec!["1", "2", "x", "4", "5", "", "7", "8", "Bad Input", "10"],
        )]);
        let report = analyze_quality(&data, 1, &QualitySettings::default()).unwrap();
        let column = report.column("A").unwrap();

        assert_eq!(column.missing_count, 3);
        assert_eq!(column.missing_fraction, 30.0);
        assert_eq!(
            column.missing_runs,
            vec![
                RowRun { start: 2, end: 2 },
                RowRun { start: 5, end: 5 },
                RowRun { start: 8, end: 8 }
            ]
        );
    }

    #[test]
    fn test_constant_column_frozen_after_warm_up() {
        let values = vec!["42"; 12];
        let data = block(vec![("flat", values)]);
        let report = analyze_quality(&data, 1, &QualitySettings::default()).unwrap();
        let column = &report.columns[0];

        assert_eq!(report.window_samples, 6);
        assert_eq!(column.missing_count, 0);
        // Rows 5..=11 close a flat window; rows 0..=4 are warm-up.
        assert_eq!(column.frozen_windows, 7);
        assert_eq!(column.freeze_count, 12);
        assert_eq!(column.freeze_fraction, 100.0);
        assert_eq!(column.freeze_runs, vec![RowRun { start: 0, end: 11 }]);
    }

    #[test]
    fn test_varying_column_only_warm_up_flagged() {
        let values: Vec<String> = (0..12).map(|i| (i * i).to_string()).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let data = block(vec![("ramp", refs)]);
        let report = analyze_quality(&data, 1, &QualitySettings::default()).unwrap();
        let column = &report.columns[0];

        assert_eq!(column.frozen_windows, 0);
        assert_eq!(column.freeze_count, 5);
        assert_eq!(column.freeze_runs, vec![RowRun { start: 0, end: 4 }]);
    }

    #[test]
    fn test_columns_analyzed_independently() {
        let data = block(vec![
            ("A", vec!["1", "2", "3", "4"]),
            ("B", vec!["", "", "", ""]),
        ]);
        let report = analyze_quality(&data, 1, &QualitySettings::default()).unwrap();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.column("A").unwrap().missing_fraction, 0.0);
        assert_eq!(report.column("B").unwrap().missing_fraction, 100.0);
        assert_eq!(
            report.column("B").unwrap().missing_runs,
            vec![RowRun { start: 0, end: 3 }]
        );
    }

    #[test]
    fn test_empty_block_reports_zero() {
        let data = block(vec![("A", vec![])]);
        let report = analyze_quality(&data, 6, &QualitySettings::default()).unwrap();
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.columns[0].missing_fraction, 0.0);
        assert_eq!(report.columns[0].freeze_fraction, 0.0);
        assert!(report.columns[0].missing_runs.is_empty());
    }

    #[test]
    fn test_window_outside_bounds_rejected() {
        let data = block(vec![("A", vec!["1"])]);
        let settings = QualitySettings::default();
        assert!(matches!(
            analyze_quality(&data, 0, &settings),
            Err(CheckError::InvalidParameter(_))
        ));
        assert!(matches!(
            analyze_quality(&data, 241, &settings),
            Err(CheckError::InvalidParameter(_))
        ));
        assert!(analyze_quality(&data, 240, &settings).is_ok());
    }

    #[test]
    fn test_oversized_sample_rate_rejected() {
        let data = block(vec![("A", vec!["1"])]);
        let settings = QualitySettings {
            samples_per_hour: 100_000_000,
            ..QualitySettings::default()
        };
        assert!(matches!(
            analyze_quality(&data, 240, &settings),
            Err(CheckError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_live_signal_far_from_first_sample_not_frozen() {
        let mut values = vec!["0"];
        values.extend((0..80).map(|i| if i % 2 == 0 { "1000000" } else { "1000000.0005" }));
        let data = block(vec![("drift", values)]);
        let report = analyze_quality(&data, 1, &QualitySettings::default()).unwrap();
        let column = &report.columns[0];

        assert_eq!(column.frozen_windows, 0);
        assert_eq!(column.freeze_runs, vec![RowRun { start: 0, end: 4 }]);
    }
}
