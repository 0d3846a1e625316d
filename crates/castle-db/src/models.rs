/// Database row types — these map directly to SQLite rows.
/// Distinct from castle-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub created_at: String,
}

pub struct GameRow {
    pub id: String,
    pub player1_id: String,
    pub player2_id: String,
    pub board_state: String,
    pub created_at: String,
    pub updated_at: String,
}
