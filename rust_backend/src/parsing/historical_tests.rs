#[cfg(test)]
mod tests {
    use crate::config::HistoricalSettings;
    use crate::core::domain::{cell, Cell, HistoricalTable};
    use crate::error::CheckError;
    use crate::parsing::historical::{
        header_records, normalize_point_name, split_historical, HEADER_BLOCK_ROWS,
    };
    use proptest::prelude::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| cell(c)).collect()
    }

    fn sample_export() -> HistoricalTable {
        HistoricalTable::new(
            vec![
                "Point Name".to_string(),
                "VIRTUAL_VIEW.LocalHistorian.U1.TI101.V.1".to_string(),
                "VIRTUAL_VIEW.LocalHistorian.U1.PI200".to_string(),
            ],
            vec![
                row(&["Description", "Bearing temperature", "Oil pressure"]),
                row(&["Extended Name", "Bearing Temp", "Oil Pressure"]),
                row(&["Extended Description", "", "lube oil header"]),
                row(&["Unit", "degC", "barg"]),
                row(&["01/01/2023 00:00", "50.1", "3.2"]),
                row(&["01/01/2023 00:10", "50.3", "Bad"]),
                row(&["01/01/2023 00:20", "", "3.1"]),
            ],
        )
    }

    #[test]
    fn test_split_separates_header_and_data() {
        let normalized = split_historical(&sample_export(), &HistoricalSettings::default()).unwrap();

        assert_eq!(normalized.header_block.rows.len(), HEADER_BLOCK_ROWS);
        let data = &normalized.data_block;
        assert_eq!(data.datetime_label, "Datetime");
        assert_eq!(data.height(), 3);
        assert_eq!(data.columns.len(), 2);
        assert_eq!(data.values[1][1].as_deref(), Some("Bad"));
        assert_eq!(data.values[0][2], None);
        assert_eq!(data.timestamps[0].as_deref(), Some("01/01/2023 00:00"));
        assert!(normalized.layout_issues.is_empty());
    }

    #[test]
    fn test_split_keeps_raw_column_identity() {
        let normalized = split_historical(&sample_export(), &HistoricalSettings::default()).unwrap();
        let label = &normalized.data_block.columns[0];
        assert_eq!(label.canonical_id, "VIRTUAL_VIEW.LocalHistorian.U1.TI101.V.1");
        assert_eq!(label.display_label, "U1.TI101.V.1");
    }

    #[test]
    fn test_split_rejects_short_table() {
        let table = HistoricalTable::new(
            vec!["Point Name".to_string(), "A".to_string()],
            vec![row(&["Description", "x"]), row(&["Extended Name", "y"])],
        );
        let result = split_historical(&table, &HistoricalSettings::default());
        assert!(matches!(
            result,
            Err(CheckError::InsufficientRows { rows: 2, required: 4 })
        ));
    }

    #[test]
    fn test_header_only_table_has_empty_data_block() {
        let mut table = sample_export();
        table.rows.truncate(4);
        let normalized = split_historical(&table, &HistoricalSettings::default()).unwrap();
        assert_eq!(normalized.data_block.height(), 0);
        assert!(normalized.data_block.values.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_layout_issues_reported_for_wrong_placeholder() {
        let mut table = sample_export();
        table.columns[0] = "Tag".to_string();
        table.rows[3][0] = Some("Units".to_string());
        let normalized = split_historical(&table, &HistoricalSettings::default()).unwrap();
        assert_eq!(normalized.layout_issues.len(), 2);
    }

    #[test]
    fn test_header_records_transpose_block() {
        let normalized = split_historical(&sample_export(), &HistoricalSettings::default()).unwrap();
        let records = header_records(&normalized.header_block, "VIRTUAL_VIEW.LocalHistorian.");

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.column_index, 1);
        assert_eq!(first.point_name, "VIRTUAL_VIEW.LocalHistorian.U1.TI101.V");
        assert_eq!(first.description.as_deref(), Some("Bearing temperature"));
        assert_eq!(first.extended_name.as_deref(), Some("Bearing Temp"));
        assert_eq!(first.extended_description, None);
        assert_eq!(first.unit.as_deref(), Some("degC"));
        assert_eq!(records[1].extended_description.as_deref(), Some("lube oil header"));
    }

    proptest! {
        #[test]
        fn prop_normalize_point_name_is_idempotent(name in "[A-Za-z0-9_.V-]{0,24}") {
            let once = normalize_point_name(&name);
            let twice = normalize_point_name(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
