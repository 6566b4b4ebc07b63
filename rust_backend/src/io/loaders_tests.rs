#[cfg(test)]
mod tests {
    use crate::io::loaders::{HistoricalLoader, TemplateLoader};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HISTORICAL_CSV: &str = "\
Point Name,VIRTUAL_VIEW.LocalHistorian.U1.TI101.V.1,VIRTUAL_VIEW.LocalHistorian.U1.TI101.V.2
Description,Bearing temp,Bearing temp
Extended Name,Bearing Temperature,Bearing Temperature
Extended Description,,
Unit,degC,degC
01/01/2023 00:00,50.1,Bad
01/01/2023 00:10,50.2,
";

    const TEMPLATE_CSV: &str = "\
Plant survey,,U1,,,,,U2,,,,
Metric Name,Metric Type,Point Type,Canary Point Name,Canary Description,Metric,Unit,Point Type,Canary Point Name,Canary Description,Metric,Unit
Bearing temperature,Process,Analog,U1.TI101.V,Bearing temp,Bearing Temperature,degC,Analog,U2.TI101.V,Bearing temp,Bearing Temperature,degC
";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_historical_load_from_csv() {
        let file = create_temp_csv(HISTORICAL_CSV);
        let table = HistoricalLoader::load_from_csv(file.path()).unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0], "Point Name");
        assert_eq!(table.height(), 6);
        assert_eq!(table.get(4, 2), Some("Bad"));
        assert_eq!(table.get(5, 2), None);
    }

    #[test]
    fn test_historical_keeps_duplicate_headers_verbatim() {
        let csv = "Point Name,PT-101,PT-101\nDescription,a,b\n";
        let table = HistoricalLoader::load_from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["Point Name", "PT-101", "PT-101"]);
    }

    #[test]
    fn test_historical_blank_headers_get_unique_names() {
        let csv = "Point Name,A,B,,\nDescription,a,b,,\n";
        let table = HistoricalLoader::load_from_bytes(csv.as_bytes()).unwrap();
        assert_eq!(
            table.columns,
            vec!["Point Name", "A", "B", "Unnamed: 3", "Unnamed: 4"]
        );
    }

    #[test]
    fn test_historical_values_stay_text() {
        let table = HistoricalLoader::load_from_bytes(HISTORICAL_CSV.as_bytes()).unwrap();
        assert_eq!(table.get(4, 1), Some("50.1"));
        assert_eq!(table.get(4, 0), Some("01/01/2023 00:00"));
    }

    #[test]
    fn test_template_load_from_csv() {
        let file = create_temp_csv(TEMPLATE_CSV);
        let table = TemplateLoader::load_from_csv(file.path()).unwrap();

        assert_eq!(table.labels[0].as_deref(), Some("Plant survey"));
        assert_eq!(table.labels[1], None);
        assert_eq!(table.labels[2].as_deref(), Some("U1"));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.get(1, 3), Some("U1.TI101.V"));
    }

    #[test]
    fn test_template_drops_blank_margin_column() {
        let csv = ",Plant survey,,U1\n,Metric Name,Metric Type,Point Type\n,Flow,Process,Analog\n";
        let table = TemplateLoader::load_from_bytes(csv.as_bytes()).unwrap();

        assert_eq!(table.labels.len(), 3);
        assert_eq!(table.labels[0].as_deref(), Some("Plant survey"));
        assert_eq!(table.get(1, 0), Some("Flow"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = HistoricalLoader::load_from_csv(std::path::Path::new("/nonexistent/export.csv"));
        assert!(result.is_err());
    }
}
