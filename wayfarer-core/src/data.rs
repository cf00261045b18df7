use crate::error::Result;
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Handle to the travel database file.
///
/// Holds only the location: every query opens its own connection and closes
/// it when done, so no transaction ever spans more than one statement string.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )?;
        Ok(conn)
    }

    /// Runs one SQL statement string.
    ///
    /// Statements starting with `select` return their rows, one per line, in
    /// the order the database yields them. Anything else runs inside a
    /// transaction that is committed before returning an empty string.
    pub fn execute_query(&self, query: &str) -> Result<String> {
        let mut conn = self.connect()?;
        info!("Executing query: {}", query.trim());

        if is_select(query) {
            let mut stmt = conn.prepare(query)?;
            let columns = stmt.column_count();
            let mut rows = stmt.query([])?;

            let mut lines = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(columns);
                for idx in 0..columns {
                    values.push(render_value(row.get_ref(idx)?));
                }
                lines.push(render_row(&values));
            }

            let output = lines.join("\n");
            info!("Query returned {} rows", lines.len());
            if !output.is_empty() {
                info!("{}", output);
            }
            Ok(output)
        } else {
            let tx = conn.transaction()?;
            tx.execute_batch(query)?;
            tx.commit()?;
            info!("Query committed");
            Ok(String::new())
        }
    }

    /// Text-protocol form of [`Database::execute_query`]: failures come back
    /// as the bare error message instead of an error value.
    pub fn run_query(&self, query: &str) -> String {
        match self.execute_query(query) {
            Ok(output) => output,
            Err(e) => {
                error!("Query failed: {}", e);
                e.to_string()
            }
        }
    }
}

fn is_select(query: &str) -> bool {
    query.trim().to_lowercase().starts_with("select")
}

/// Tuple notation for a row: `(1, 'Africa')`, and `(7,)` for a single column.
fn render_row(values: &[String]) -> String {
    match values {
        [single] => format!("({},)", single),
        _ => format!("({})", values.join(", ")),
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "None".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format!("{:?}", f),
        ValueRef::Text(bytes) => quote_text(&String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => quote_bytes(bytes),
    }
}

fn quote_text(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::from("b'");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_select() {
        assert!(is_select("  SELECT * FROM continents;"));
        assert!(is_select("\nselect 1"));
        assert!(!is_select("INSERT INTO t VALUES (1)"));
        assert!(!is_select("WITH x AS (SELECT 1) SELECT * FROM x"));
    }

    #[test]
    fn test_render_row() {
        assert_eq!(render_row(&["7".to_string()]), "(7,)");
        assert_eq!(
            render_row(&["1".to_string(), "'Africa'".to_string()]),
            "(1, 'Africa')"
        );
    }

    #[test]
    fn test_render_values() {
        assert_eq!(render_value(ValueRef::Null), "None");
        assert_eq!(render_value(ValueRef::Real(9833517.0)), "9833517.0");
        assert_eq!(render_value(ValueRef::Real(2.5)), "2.5");
        assert_eq!(render_value(ValueRef::Text(b"it's")), "\"it's\"");
        assert_eq!(render_value(ValueRef::Blob(&[0x41, 0x00])), "b'A\\x00'");
    }
}
