//! SQLite-backed city store.
//!
//! Two tables live in the same file:
//! - `ibge`: reference list of municipality names, read by the builder
//! - `cptec`: lookup table from normalized name to CPTEC city

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use crate::models::City;
use crate::Result;

/// SQLite city store, shared between handlers behind an `Arc`.
pub struct CityStore {
    conn: Mutex<Connection>,
}

impl CityStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS ibge (
                id INTEGER NOT NULL,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cptec (
                key TEXT NOT NULL,
                id INTEGER NOT NULL,
                name TEXT NOT NULL,
                state TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cptec_key ON cptec(key);
            "#,
        )?;
        Ok(())
    }

    /// Reference municipality names, in id order.
    pub fn reference_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name FROM ibge ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Add a name to the reference list.
    pub fn add_reference_name(&self, id: i64, name: &str) -> Result<()> {
        self.conn
            .lock()
            .execute("INSERT INTO ibge (id, name) VALUES (?1, ?2)", params![id, name])?;
        Ok(())
    }

    /// Insert a city under its lookup key. Duplicates are kept.
    pub fn insert_city(&self, city: &City) -> Result<()> {
        let key = city.lookup_key();
        self.conn.lock().execute(
            "INSERT INTO cptec (key, id, name, state) VALUES (?1, ?2, ?3, ?4)",
            params![key, city.id, city.name, city.state],
        )?;
        debug!("Stored {} ({}) under {:?}", city.name, city.id, key);
        Ok(())
    }

    /// Exact match on the lookup key. The first stored row wins.
    pub fn find_city(&self, key: &str) -> Result<Option<City>> {
        let conn = self.conn.lock();
        let city = conn
            .query_row(
                "SELECT id, name, state FROM cptec WHERE key = ?1 ORDER BY rowid LIMIT 1",
                params![key],
                |row| {
                    Ok(City {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        state: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(city)
    }

    /// Number of rows in the lookup table.
    pub fn city_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM cptec", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
