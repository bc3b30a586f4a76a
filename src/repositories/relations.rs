// src/repositories/relations.rs
//
// One-to-many assembly
//
// Child rows are fetched with their parent id and grouped here, one Vec per
// parent. Every field of a child comes from the same result row, so there is
// nothing to realign afterwards.

use std::collections::HashMap;

use rusqlite::{params_from_iter, Connection, Row};

use crate::error::AppResult;
use crate::repositories::query::IdQuery;

/// Run `sql` (which must contain exactly one `{ids}` marker standing for
/// the id selection) and group the mapped rows by the parent id the mapper
/// returns. Row order within each parent is the query's order.
pub fn load_grouped<T, F>(
    conn: &Connection,
    sql: &str,
    ids: &IdQuery,
    mut map: F,
) -> AppResult<HashMap<i64, Vec<T>>>
where
    F: FnMut(&Row) -> rusqlite::Result<(i64, T)>,
{
    let sql = sql.replace("{ids}", &ids.sql);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(ids.params.iter()))?;

    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let (parent_id, child) = map(row)?;
        grouped.entry(parent_id).or_default().push(child);
    }
    Ok(grouped)
}

/// Run `sql` with the `{ids}` marker substituted and map every row
pub fn load_rows<T, F>(conn: &Connection, sql: &str, ids: &IdQuery, map: F) -> AppResult<Vec<T>>
where
    F: FnMut(&Row) -> rusqlite::Result<T>,
{
    let sql = sql.replace("{ids}", &ids.sql);
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params_from_iter(ids.params.iter()), map)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}
