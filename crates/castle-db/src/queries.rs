use crate::Database;
use crate::models::{GameRow, UserRow};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str, email: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, email) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, email),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn user_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM users WHERE id = ?1", [id], |row| {
                    row.get(0)
                })?;
            Ok(count > 0)
        })
    }

    /// Administrative removal. Games referencing the user as either player
    /// go with it via ON DELETE CASCADE.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Games --

    pub fn insert_game(
        &self,
        id: &str,
        player1_id: &str,
        player2_id: &str,
        board_state: &str,
    ) -> Result<GameRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO games (id, player1_id, player2_id, board_state) VALUES (?1, ?2, ?3, ?4)",
                (id, player1_id, player2_id, board_state),
            )?;
            query_game(conn, id)?.ok_or_else(|| anyhow!("Game missing after insert: {}", id))
        })
    }

    pub fn list_games(&self) -> Result<Vec<GameRow>> {
        self.with_conn(query_games)
    }

    pub fn get_game(&self, id: &str) -> Result<Option<GameRow>> {
        self.with_conn(|conn| query_game(conn, id))
    }

    /// Partial update: NULL parameters keep the stored value, updated_at is
    /// refreshed unconditionally. Returns the new row, or None if the id
    /// matched nothing.
    pub fn update_game(
        &self,
        id: &str,
        player1_id: Option<&str>,
        player2_id: Option<&str>,
        board_state: Option<&str>,
    ) -> Result<Option<GameRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE games SET
                     player1_id  = COALESCE(?2, player1_id),
                     player2_id  = COALESCE(?3, player2_id),
                     board_state = COALESCE(?4, board_state),
                     updated_at  = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                rusqlite::params![id, player1_id, player2_id, board_state],
            )?;

            if changed == 0 {
                return Ok(None);
            }
            query_game(conn, id)
        })
    }

    pub fn delete_game(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM games WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn
        .prepare("SELECT id, username, password, email, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, email, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_game(conn: &Connection, id: &str) -> Result<Option<GameRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, player1_id, player2_id, board_state, created_at, updated_at
         FROM games
         WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_game_row).optional()?;

    Ok(row)
}

fn query_games(conn: &Connection) -> Result<Vec<GameRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, player1_id, player2_id, board_state, created_at, updated_at
         FROM games
         ORDER BY created_at",
    )?;

    let rows = stmt
        .query_map([], map_game_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_game_row(row: &rusqlite::Row<'_>) -> std::result::Result<GameRow, rusqlite::Error> {
    Ok(GameRow {
        id: row.get(0)?,
        player1_id: row.get(1)?,
        player2_id: row.get(2)?,
        board_state: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
