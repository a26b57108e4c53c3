use crate::domain::model::Record;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};

pub const CSV_HEADER: [&str; 4] = ["name", "species", "height", "appearances"];

/// Serialises enriched records to the CSV artifact.
pub struct Writer<'a, S: Storage> {
    storage: &'a S,
    artifact_name: &'a str,
    expected_len: usize,
    snapshot_name: Option<&'a str>,
}

impl<'a, S: Storage> Writer<'a, S> {
    pub fn new(storage: &'a S, artifact_name: &'a str, expected_len: usize) -> Self {
        Self {
            storage,
            artifact_name,
            expected_len,
            snapshot_name: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot_name: Option<&'a str>) -> Self {
        self.snapshot_name = snapshot_name;
        self
    }

    /// Writes `records` in input order, replacing any previous artifact.
    ///
    /// Both outputs are serialised before anything is written, and the snapshot is stored
    /// first: a failed snapshot leaves the previous artifact untouched.
    pub async fn write(&self, records: &[Record]) -> Result<String> {
        self.check_cardinality(records.len())?;

        let csv_data = to_csv(records)?;
        let snapshot = match self.snapshot_name {
            Some(name) => Some((name, serde_json::to_vec_pretty(records)?)),
            None => None,
        };

        if let Some((name, json_data)) = snapshot {
            self.storage.write_file(name, &json_data).await?;
            tracing::debug!("Records snapshot saved to {}", self.storage.location(name));
        }

        tracing::debug!("Writing CSV ({} bytes) to storage", csv_data.len());
        self.storage.write_file(self.artifact_name, &csv_data).await?;

        let location = self.storage.location(self.artifact_name);
        tracing::info!("💾 Wrote {} records to {}", records.len(), location);
        Ok(location)
    }

    /// Loosely-typed entry point: validates each element as a [`Record`] before writing.
    pub async fn write_values(
        &self,
        values: &[serde_json::Value],
    ) -> Result<(String, Vec<Record>)> {
        self.check_cardinality(values.len())?;
        let records = records_from_values(values)?;
        let location = self.write(&records).await?;
        Ok((location, records))
    }

    fn check_cardinality(&self, found: usize) -> Result<()> {
        if found != self.expected_len {
            return Err(EtlError::CardinalityError {
                expected: self.expected_len,
                found,
            });
        }
        Ok(())
    }
}

pub fn records_from_values(values: &[serde_json::Value]) -> Result<Vec<Record>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value.clone()).map_err(|e| EtlError::ShapeError {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Header row plus one row per record; fields are quoted only when needed.
pub fn to_csv(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        read_only: Option<&'static str>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                read_only: None,
            }
        }

        fn with_read_only(mut self, path: &'static str) -> Self {
            self.read_only = Some(path);
            self
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.read_only == Some(path) {
                return Err(EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("Read-only: {}", path),
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("mock://{}", path)
        }
    }

    fn reference_records() -> Vec<Record> {
        vec![
            Record::new("Chewbacca", "Wookiee", 228, 5),
            Record::new("Darth Vader", "Human", 202, 4),
            Record::new("Obi-Wan Kenobi", "Human", 182, 6),
            Record::new("Han Solo", "Human", 180, 4),
            Record::new("Luke Skywalker", "Human", 172, 5),
            Record::new("Palpatine", "Human", 170, 5),
            Record::new("C-3PO", "Droid", 167, 6),
            Record::new("Leia Organa", "Human", 150, 5),
            Record::new("R2-D2", "Droid", 96, 7),
            Record::new("Yoda", "Yoda's species", 66, 5),
        ]
    }

    #[tokio::test]
    async fn test_write_reference_records() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 10);

        let location = writer.write(&reference_records()).await.unwrap();
        assert_eq!(location, "mock://answer.csv");

        let data = storage.get_file("answer.csv").await.unwrap();
        let text = String::from_utf8(data).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "name,species,height,appearances");
        assert_eq!(lines[1], "Chewbacca,Wookiee,228,5");
        assert_eq!(lines[10], "Yoda,Yoda's species,66,5");
    }

    #[tokio::test]
    async fn test_write_wrong_cardinality() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 10);
        let mut records = reference_records();
        records.pop();

        let err = writer.write(&records).await.unwrap_err();

        assert!(matches!(
            err,
            EtlError::CardinalityError {
                expected: 10,
                found: 9
            }
        ));
        assert!(storage.get_file("answer.csv").await.is_none());
    }

    #[tokio::test]
    async fn test_write_values_checks_cardinality_before_shape() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 10);

        let err = writer
            .write_values(&[serde_json::json!("bad")])
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::CardinalityError { found: 1, .. }));
    }

    #[tokio::test]
    async fn test_write_values_rejects_wrong_shape() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 10);
        let mut values: Vec<serde_json::Value> = reference_records()
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        values[0] = serde_json::json!("bad");

        let err = writer.write_values(&values).await.unwrap_err();

        assert!(matches!(err, EtlError::ShapeError { index: 0, .. }));
        assert!(storage.get_file("answer.csv").await.is_none());
    }

    #[test]
    fn test_write_values_rejects_unknown_fields() {
        let values = vec![serde_json::json!({
            "name": "Chewbacca",
            "species": "Wookiee",
            "height": 228,
            "appearances": 5,
            "mass": 112
        })];

        let err = records_from_values(&values).unwrap_err();
        assert!(matches!(err, EtlError::ShapeError { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_write_values_accepts_records() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 10);
        let values: Vec<serde_json::Value> = reference_records()
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();

        let (location, records) = assert_ok!(writer.write_values(&values).await);

        assert_eq!(location, "mock://answer.csv");
        assert_eq!(records, reference_records());
    }

    #[tokio::test]
    async fn test_write_with_snapshot() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 10).with_snapshot(Some("answer.json"));

        assert_ok!(writer.write(&reference_records()).await);

        let snapshot = storage.get_file("answer.json").await.unwrap();
        let restored: Vec<Record> = serde_json::from_slice(&snapshot).unwrap();
        assert_eq!(restored, reference_records());
    }

    #[tokio::test]
    async fn test_failed_snapshot_keeps_previous_artifact() {
        let storage = MockStorage::new().with_read_only("answer.json");
        storage
            .write_file("answer.csv", b"previous run\n")
            .await
            .unwrap();
        let writer = Writer::new(&storage, "answer.csv", 10).with_snapshot(Some("answer.json"));

        let err = writer.write(&reference_records()).await.unwrap_err();

        assert!(matches!(err, EtlError::IoError(_)));
        let data = storage.get_file("answer.csv").await.unwrap();
        assert_eq!(data, b"previous run\n");
    }

    #[tokio::test]
    async fn test_write_respects_expected_len() {
        let storage = MockStorage::new();
        let writer = Writer::new(&storage, "answer.csv", 2);

        assert_err!(writer.write(&reference_records()).await);
        assert_ok!(writer.write(&reference_records()[..2]).await);
    }

    #[test]
    fn test_to_csv_quotes_only_when_needed() {
        let records = vec![
            Record::new("Bail Prestor Organa", "Human", 191, 2),
            Record::new("Jabba, the Hutt", "Hutt", 175, 3),
            Record::new("\"Snoke\"", "Unknown", 215, 2),
        ];

        let text = String::from_utf8(to_csv(&records).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "Bail Prestor Organa,Human,191,2");
        assert_eq!(lines[2], "\"Jabba, the Hutt\",Hutt,175,3");
        assert_eq!(lines[3], "\"\"\"Snoke\"\"\",Unknown,215,2");
    }

    #[test]
    fn test_to_csv_header_only_for_empty_input() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "name,species,height,appearances\n");
    }
}
