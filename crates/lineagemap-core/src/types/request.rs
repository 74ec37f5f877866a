//! Request types for the lineage analysis API.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LineageError;

/// A request to map column-level lineage for a piece of pipeline code.
///
/// The request is validated on construction and immutable afterwards: the
/// source code is guaranteed to contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct LineageRequest {
    /// The code to analyze, kept verbatim (no trimming is applied)
    source_code: String,

    /// The kind of code being submitted
    source_type: SourceType,
}

impl LineageRequest {
    /// Builds a request, rejecting blank source code with [`LineageError::EmptyInput`].
    pub fn new(source_code: impl Into<String>, source_type: SourceType) -> Result<Self, LineageError> {
        let source_code = source_code.into();
        if source_code.trim().is_empty() {
            return Err(LineageError::EmptyInput);
        }
        Ok(Self {
            source_code,
            source_type,
        })
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }
}

/// Kind of code submitted for lineage mapping.
///
/// The source type only steers the prompt; no local parsing is performed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Sql,
    #[serde(alias = "spark")]
    Pyspark,
    Dbt,
    Airflow,
    Other,
}

impl SourceType {
    pub const ALL: [SourceType; 5] = [
        SourceType::Sql,
        SourceType::Pyspark,
        SourceType::Dbt,
        SourceType::Airflow,
        SourceType::Other,
    ];

    /// Stable identifier used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Pyspark => "pyspark",
            Self::Dbt => "dbt",
            Self::Airflow => "airflow",
            Self::Other => "other",
        }
    }

    /// Human-readable name embedded in the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sql => "SQL",
            Self::Pyspark => "PySpark",
            Self::Dbt => "dbt model",
            Self::Airflow => "Airflow DAG",
            Self::Other => "ETL pipeline code",
        }
    }

    /// Language used by code editors for syntax highlighting.
    ///
    /// dbt models are Jinja-templated SQL, PySpark and Airflow are Python.
    pub fn highlight_language(&self) -> &'static str {
        match self {
            Self::Sql | Self::Dbt => "sql",
            Self::Pyspark | Self::Airflow => "python",
            Self::Other => "text",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sql" => Ok(Self::Sql),
            "pyspark" | "spark" => Ok(Self::Pyspark),
            "dbt" => Ok(Self::Dbt),
            "airflow" => Ok(Self::Airflow),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown source type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_source_is_rejected() {
        for input in ["", "   ", "\n\t  \r\n"] {
            let err = LineageRequest::new(input, SourceType::Sql).unwrap_err();
            assert!(matches!(err, LineageError::EmptyInput));
        }
    }

    #[test]
    fn source_code_is_kept_verbatim() {
        let request = LineageRequest::new("  SELECT 1\n", SourceType::Dbt).unwrap();
        assert_eq!(request.source_code(), "  SELECT 1\n");
        assert_eq!(request.source_type(), SourceType::Dbt);
    }

    #[test]
    fn source_type_round_trips_through_str() {
        for source_type in SourceType::ALL {
            assert_eq!(source_type.as_str().parse::<SourceType>(), Ok(source_type));
        }
        assert_eq!("Spark".parse::<SourceType>(), Ok(SourceType::Pyspark));
        assert!("cobol".parse::<SourceType>().is_err());
    }

    #[test]
    fn source_type_serializes_lowercase() {
        let json = serde_json::to_string(&SourceType::Pyspark).unwrap();
        assert_eq!(json, "\"pyspark\"");
        let parsed: SourceType = serde_json::from_str("\"airflow\"").unwrap();
        assert_eq!(parsed, SourceType::Airflow);
    }
}
