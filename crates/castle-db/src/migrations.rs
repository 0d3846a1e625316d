use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            email       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS games (
            id          TEXT PRIMARY KEY,
            player1_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            player2_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            board_state TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_games_player1
            ON games(player1_id);

        CREATE INDEX IF NOT EXISTS idx_games_player2
            ON games(player2_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
