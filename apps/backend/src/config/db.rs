use std::env;

use crate::error::AppError;

/// Database profile enum for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// Production database profile - single-file SQLite store
    Prod,
    /// Test database profile - enforces safety rules
    Test,
}

/// Builds a SQLite connection URL from environment variables based on profile.
///
/// Prod resolves `GOLF_DB_PATH` (defaulting to `./golf-scores.db`).
/// Test resolves `GOLF_TEST_DB_PATH` and
/// requires the file name to end with `_test.db` so a test run can never
/// point at a real store; with no test path configured it falls back to an
/// in-memory database.
pub fn db_url(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => {
            let path =
                env::var("GOLF_DB_PATH").unwrap_or_else(|_| "./golf-scores.db".to_string());
            Ok(format!("sqlite://{path}"))
        }
        DbProfile::Test => match env::var("GOLF_TEST_DB_PATH") {
            Ok(path) => {
                if !path.ends_with("_test.db") {
                    return Err(AppError::config(format!(
                        "Test profile requires database file to end with '_test.db', but got: '{path}'"
                    )));
                }
                Ok(format!("sqlite://{path}"))
            }
            Err(_) => Ok(MEMORY_DB_URL.to_string()),
        },
    }
}

/// URL of the shared in-memory database used by the Test profile.
pub const MEMORY_DB_URL: &str = "sqlite::memory:";

/// Whether a URL built by [`db_url`] points at the in-memory database.
pub fn is_memory_url(url: &str) -> bool {
    url == MEMORY_DB_URL
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{db_url, is_memory_url, DbProfile};

    // Env-var mutation is process-global; keep each test to distinct vars.

    #[test]
    fn test_db_url_prod_default() {
        env::remove_var("GOLF_DB_PATH");
        let url = db_url(DbProfile::Prod).unwrap();
        assert_eq!(url, "sqlite://./golf-scores.db");
    }

    #[test]
    fn test_db_url_test_defaults_to_memory() {
        env::remove_var("GOLF_TEST_DB_PATH");
        let url = db_url(DbProfile::Test).unwrap();
        assert!(is_memory_url(&url));
    }

    #[test]
    fn test_db_url_test_invalid_name() {
        env::set_var("GOLF_TEST_DB_PATH", "./golf-scores.db"); // Invalid: not a _test.db file
        let result = db_url(DbProfile::Test);
        env::remove_var("GOLF_TEST_DB_PATH");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("_test.db"));
    }
}
