//! SQLite-backed item store for the remote variant.
//!
//! # Responsibility
//! - Persist per-owner item documents with store-generated keys.
//! - Assign `created_at` on insert and serve filtered/ordered reads.
//!
//! # Invariants
//! - Every statement is scoped by `owner_uid`.
//! - Each mutation is one independent statement; no multi-item transactions.

use crate::model::item::{Item, ItemId, ItemPatch, NewItem};
use crate::model::session::OwnerId;
use crate::model::view::SortOrder;
use crate::repo::item_repo::{validate_patch, ItemListQuery, ItemStore, StoreError, StoreResult};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    text,
    completed,
    created_at
FROM items";

/// Item store owning its SQLite connection.
pub struct SqliteItemStore {
    conn: Connection,
}

impl SqliteItemStore {
    /// Wraps a migrated connection from `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ItemStore for SqliteItemStore {
    fn add_item(&mut self, owner: &OwnerId, item: &NewItem) -> StoreResult<ItemId> {
        let text = crate::model::item::normalize_text(&item.text)?;
        let id = ItemId::new(Uuid::new_v4().to_string());

        self.conn.execute(
            "INSERT INTO items (id, owner_uid, text, completed) VALUES (?1, ?2, ?3, 0);",
            params![id.as_str(), owner.as_str(), text],
        )?;

        debug!("event=item_add module=repo status=ok store=sqlite");
        Ok(id)
    }

    fn update_item(
        &mut self,
        owner: &OwnerId,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> StoreResult<()> {
        validate_patch(patch)?;
        let text = patch.text.as_deref().map(str::trim);

        let changed = self.conn.execute(
            "UPDATE items
             SET
                text = COALESCE(?1, text),
                completed = COALESCE(?2, completed)
             WHERE id = ?3 AND owner_uid = ?4;",
            params![
                text,
                patch.completed.map(bool_to_int),
                id.as_str(),
                owner.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    fn delete_item(&mut self, owner: &OwnerId, id: &ItemId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM items WHERE id = ?1 AND owner_uid = ?2;",
            params![id.as_str(), owner.as_str()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    fn list_items(&self, owner: &OwnerId, query: &ItemListQuery) -> StoreResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE owner_uid = ?");
        let mut bind_values = vec![Value::Text(owner.as_str().to_string())];

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        // rowid breaks ties between items created within the same millisecond.
        sql.push_str(match query.sort {
            Some(SortOrder::NewestFirst) => " ORDER BY created_at DESC, rowid DESC",
            Some(SortOrder::OldestFirst) => " ORDER BY created_at ASC, rowid ASC",
            None => " ORDER BY rowid ASC",
        });

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in items.completed"
            )));
        }
    };

    let item = Item {
        id: ItemId::new(row.get::<_, String>("id")?),
        text: row.get("text")?,
        completed,
        created_at: row.get("created_at")?,
    };
    item.validate()?;
    Ok(item)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
