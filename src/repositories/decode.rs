// src/repositories/decode.rs
//
// Column decoders shared by the row mappers.
//
// Every parse failure is an explicit conversion error; nothing falls back
// to a default value.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::Row;

use crate::domain::media_content::MediaType;
use crate::domain::zodiac::{Planet, SignIds, SignNames};

/// Storage format of date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn conversion_failure(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

fn column_index(row: &Row, column: &str) -> usize {
    row.as_ref().column_index(column).unwrap_or(0)
}

/// Read an optional ISO date column
pub fn date_column(row: &Row, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
            conversion_failure(
                column_index(row, column),
                format!("Invalid {} '{}': {}", column, s, e),
            )
        })
    })
    .transpose()
}

/// Read a media type column
pub fn media_type_column(row: &Row, column: &str) -> rusqlite::Result<MediaType> {
    let raw: String = row.get(column)?;
    raw.parse::<MediaType>()
        .map_err(|e| conversion_failure(column_index(row, column), e.to_string()))
}

/// Format a date for storage
pub fn date_param(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Read all eleven `*_sign_id` columns
pub fn sign_ids(row: &Row) -> rusqlite::Result<SignIds> {
    let mut signs = SignIds::default();
    for planet in Planet::ALL {
        signs.set(planet, row.get(planet.sign_id_column())?);
    }
    Ok(signs)
}

/// Read all eleven `*_sign_name` columns
pub fn sign_names(row: &Row) -> rusqlite::Result<SignNames> {
    let mut names = SignNames::default();
    for planet in Planet::ALL {
        names.set(planet, row.get(planet.sign_name_column())?);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_date_column_parses_iso_dates() {
        let conn = Connection::open_in_memory().unwrap();
        let date = conn
            .query_row("SELECT '1998-08-26' AS birth_date", [], |row| {
                date_column(row, "birth_date")
            })
            .unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1998, 8, 26));
    }

    #[test]
    fn test_date_column_null_is_none() {
        let conn = Connection::open_in_memory().unwrap();
        let date = conn
            .query_row("SELECT NULL AS birth_date", [], |row| date_column(row, "birth_date"))
            .unwrap();
        assert_eq!(date, None);
    }

    #[test]
    fn test_malformed_date_fails_loudly() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.query_row("SELECT 'August' AS birth_date", [], |row| {
            date_column(row, "birth_date")
        });
        assert!(matches!(result, Err(rusqlite::Error::FromSqlConversionFailure(..))));
    }

    #[test]
    fn test_unknown_media_type_fails_loudly() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.query_row("SELECT 'podcast' AS type", [], |row| {
            media_type_column(row, "type")
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_date_param_format() {
        assert_eq!(
            date_param(NaiveDate::from_ymd_opt(2018, 5, 2)),
            Some("2018-05-02".to_string())
        );
        assert_eq!(date_param(None), None);
    }
}
