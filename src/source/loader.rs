//! Fixture loading over HTTP or from disk.
//!
//! The three datasets are fetched concurrently; the load fails as soon as
//! any one of them fails.

use super::{AttendanceFile, Dataset, EmployeeDirectory, PayrollFile, SourceLocations};
use crate::error::LoadError;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How much of an unexpected body to quote in errors.
const SNIPPET_CHARS: usize = 200;

/// Loads the three datasets from their configured locations.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: reqwest::Client,
    locations: SourceLocations,
}

impl SourceLoader {
    /// Create a loader whose HTTP requests give up after `timeout_seconds`.
    pub fn new(locations: SourceLocations, timeout_seconds: u64) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client, locations })
    }

    pub fn locations(&self) -> &SourceLocations {
        &self.locations
    }

    /// Fetch all three datasets concurrently.
    pub async fn load(&self) -> Result<Dataset, LoadError> {
        info!(
            "Loading fixtures: {}, {}, {}",
            self.locations.employees, self.locations.payroll, self.locations.attendance
        );

        let (directory, payroll, attendance) = futures::try_join!(
            self.fetch::<EmployeeDirectory>(&self.locations.employees),
            self.fetch::<PayrollFile>(&self.locations.payroll),
            self.fetch::<AttendanceFile>(&self.locations.attendance),
        )?;

        let mut dataset = Dataset {
            employees: directory.employees,
            payroll: payroll.payroll,
            attendance: attendance.attendance,
        };
        dataset.assign_leave_ids();

        info!(
            "Loaded {} employees, {} payroll entries, {} attendance entries",
            dataset.employees.len(),
            dataset.payroll.len(),
            dataset.attendance.len()
        );

        Ok(dataset)
    }

    /// Fetch and decode one location.
    async fn fetch<T: DeserializeOwned>(&self, location: &str) -> Result<T, LoadError> {
        let body = if is_http(location) {
            self.fetch_http(location).await?
        } else {
            fetch_file(location).await?
        };

        serde_json::from_slice(&body).map_err(|source| LoadError::Parse {
            location: location.to_string(),
            source,
        })
    }

    async fn fetch_http(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        debug!("GET {}", location);

        let transport = |source| LoadError::Transport {
            location: location.to_string(),
            source,
        };

        let response = self.client.get(location).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Status {
                location: location.to_string(),
                status: status.as_u16(),
                snippet: snippet(&body),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        if !content_type.contains("application/json") {
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Format {
                location: location.to_string(),
                content_type,
                snippet: snippet(&body),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        debug!("Received {} bytes from {}", bytes.len(), location);
        Ok(bytes.to_vec())
    }
}

/// Convenience wrapper: build a loader and load once.
pub async fn load_dataset(
    locations: SourceLocations,
    timeout_seconds: u64,
) -> Result<Dataset, LoadError> {
    let loader = SourceLoader::new(locations.clone(), timeout_seconds).map_err(|source| {
        LoadError::Transport {
            location: locations.employees.clone(),
            source,
        }
    })?;
    loader.load().await
}

fn is_http(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn fetch_file(location: &str) -> Result<Vec<u8>, LoadError> {
    let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
    debug!("Reading {}", path.display());

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        location: location.to_string(),
        source,
    })?;

    if !is_json {
        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!("unknown (.{})", ext))
            .unwrap_or_else(|| "unknown".to_string());
        return Err(LoadError::Format {
            location: location.to_string(),
            content_type,
            snippet: snippet(&String::from_utf8_lossy(&bytes)),
        });
    }

    Ok(bytes)
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::test_support::{serve, Route};
    use tempfile::TempDir;

    const EMPLOYEES: &str = r#"{"employeeInformation": [
        {"employeeId": 1, "name": "A", "position": "Dev", "department": "IT",
         "salary": 1000, "employmentHistory": "Joined in 2020", "contact": "a@example.com"}
    ]}"#;
    const PAYROLL: &str = r#"{"payrollData": [{"employeeId": 1, "hoursWorked": 160, "finalSalary": 1200}]}"#;
    const ATTENDANCE: &str = r#"{"attendanceAndLeave": [
        {"employeeId": 1, "name": "A",
         "attendance": [{"date": "2025-07-25", "status": "Present"}],
         "leaveRequests": [{"id": 10, "date": "2025-07-25", "reason": "Sick", "status": "Pending"}]}
    ]}"#;

    fn locations(base: &str) -> SourceLocations {
        SourceLocations {
            employees: format!("{}/employee_info.json", base),
            payroll: format!("{}/payroll_data.json", base),
            attendance: format!("{}/attendance.json", base),
        }
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let base = serve(vec![
            ("/employee_info.json", Route::json(EMPLOYEES)),
            ("/payroll_data.json", Route::json(PAYROLL)),
            ("/attendance.json", Route::json(ATTENDANCE)),
        ])
        .await;

        let dataset = load_dataset(locations(&base), 5).await.unwrap();
        assert_eq!(dataset.employees.len(), 1);
        assert_eq!(dataset.payroll[0].final_salary, Some(1200.0));
        assert_eq!(dataset.attendance[0].leave_requests[0].id, Some(10));
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let base = serve(vec![
            ("/employee_info.json", Route::json(EMPLOYEES)),
            ("/attendance.json", Route::json(ATTENDANCE)),
        ])
        .await;

        let err = tokio_test::assert_err!(load_dataset(locations(&base), 5).await);
        match err {
            LoadError::Status {
                location,
                status,
                snippet,
            } => {
                assert!(location.ends_with("payroll_data.json"));
                assert_eq!(status, 404);
                assert!(snippet.contains("Not Found"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_format_error() {
        let base = serve(vec![
            ("/employee_info.json", Route::with_status(200, "text/html", "<html>login</html>")),
            ("/payroll_data.json", Route::json(PAYROLL)),
            ("/attendance.json", Route::json(ATTENDANCE)),
        ])
        .await;

        let err = load_dataset(locations(&base), 5).await.unwrap_err();
        assert!(err.is_format());
        assert!(matches!(err, LoadError::Format { ref content_type, .. } if content_type == "text/html"));
        assert!(err.to_string().contains("<html>login</html>"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let base = serve(vec![
            ("/employee_info.json", Route::json(EMPLOYEES)),
            ("/payroll_data.json", Route::json("{not json")),
            ("/attendance.json", Route::json(ATTENDANCE)),
        ])
        .await;

        let err = load_dataset(locations(&base), 5).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.location().ends_with("payroll_data.json"));
    }

    #[tokio::test]
    async fn test_load_from_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("employee_info.json"), EMPLOYEES).unwrap();
        std::fs::write(temp_dir.path().join("payroll_data.json"), PAYROLL).unwrap();
        std::fs::write(temp_dir.path().join("attendance.json"), ATTENDANCE).unwrap();

        let dataset = load_dataset(SourceLocations::from_data_dir(temp_dir.path()), 5)
            .await
            .unwrap();
        assert_eq!(dataset.employees[0].name, "A");
        assert_eq!(dataset.attendance[0].attendance.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_entries_do_not_fail_the_load() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("employee_info.json"), EMPLOYEES).unwrap();
        std::fs::write(temp_dir.path().join("payroll_data.json"), PAYROLL).unwrap();
        std::fs::write(
            temp_dir.path().join("attendance.json"),
            r#"{"attendanceAndLeave": [
                {"employeeId": 1, "name": "A",
                 "attendance": [{"date": "", "status": "Absent"}, {"date": "2025-07-25", "status": "Present"}],
                 "leaveRequests": []},
                {"name": "No Id", "attendance": []}
            ]}"#,
        )
        .unwrap();

        let dataset = load_dataset(SourceLocations::from_data_dir(temp_dir.path()), 5)
            .await
            .unwrap();
        assert_eq!(dataset.attendance.len(), 1);
        assert_eq!(dataset.attendance[0].attendance.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_dataset(SourceLocations::from_data_dir(temp_dir.path()), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_non_json_file_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("employees.csv");
        std::fs::write(&path, "id,name\n1,A\n").unwrap();

        let err = fetch_file(&path.display().to_string()).await.unwrap_err();
        assert!(matches!(err, LoadError::Format { ref content_type, .. } if content_type == "unknown (.csv)"));
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), 200);
        assert!(is_http("HTTPS://example.com/a.json"));
        assert!(!is_http("./fixtures/a.json"));
    }
}
