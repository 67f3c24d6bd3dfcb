//! Durable per-session cart persistence
//!
//! Each session owns one row holding the cart as a bare JSON array of lines.
//! Loading tolerates whatever is in the row: malformed payloads become an
//! empty cart so a session can always render.

use sqlx::PgPool;

use crate::domain::Cart;
use crate::error::Result;

#[derive(Clone)]
pub struct CartStore {
    pool: PgPool,
}

impl CartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn load(&self, session_id: &str) -> Result<Cart> {
        let payload: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM cart_sessions WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(match payload {
            Some((json,)) => Cart::from_json(&json),
            None => Cart::new(),
        })
    }

    pub async fn save(&self, session_id: &str, cart: &Cart) -> Result<()> {
        sqlx::query(
            "INSERT INTO cart_sessions (session_id, payload, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (session_id) DO UPDATE SET payload = $2, updated_at = NOW()",
        )
        .bind(session_id)
        .bind(cart.to_json())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn clear(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM cart_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
