// src/db/transaction.rs
//
// All-or-nothing execution of multi-statement writes.
//
// A reader must never observe a parent row without its junction rows,
// so every multi-table write goes through `run_in_transaction`.

use rusqlite::{Connection, Transaction};

use crate::error::AppResult;

/// Run `work` inside a transaction.
///
/// Commits when `work` succeeds. On any error the transaction is rolled back
/// before the original error is returned to the caller.
pub fn run_in_transaction<T, F>(conn: &mut Connection, operation: &str, work: F) -> AppResult<T>
where
    F: FnOnce(&Transaction<'_>) -> AppResult<T>,
{
    let tx = conn.transaction()?;

    match work(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            log::warn!("Rolling back {}: {}", operation, err);
            if let Err(rollback_err) = tx.rollback() {
                log::error!("Rollback of {} failed: {}", operation, rollback_err);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER NOT NULL)").unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_commits_on_success() {
        let mut conn = setup();

        let inserted = run_in_transaction(&mut conn, "insert", |tx| {
            tx.execute("INSERT INTO t (x) VALUES (1)", [])?;
            tx.execute("INSERT INTO t (x) VALUES (2)", [])?;
            Ok(2)
        })
        .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn test_rolls_back_every_statement_on_failure() {
        let mut conn = setup();

        let result: AppResult<()> = run_in_transaction(&mut conn, "insert", |tx| {
            tx.execute("INSERT INTO t (x) VALUES (1)", [])?;
            tx.execute("INSERT INTO t (x) VALUES (NULL)", [])?;
            Ok(())
        });

        assert!(result.unwrap_err().is_constraint_violation());
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_application_error_also_rolls_back() {
        let mut conn = setup();

        let result: AppResult<()> = run_in_transaction(&mut conn, "insert", |tx| {
            tx.execute("INSERT INTO t (x) VALUES (1)", [])?;
            Err(AppError::NotFound)
        });

        assert!(matches!(result, Err(AppError::NotFound)));
        assert_eq!(count(&conn), 0);
    }
}
