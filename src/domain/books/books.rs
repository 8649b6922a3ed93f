use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ids::BookId;

/// Field name carrying a document's identifier on the wire.
pub const ID_FIELD: &str = "_id";

/// Free-form book fields as submitted by the client.
pub type BookFields = Map<String, Value>;

/// A stored book document: the client's fields plus the assigned `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    #[serde(flatten)]
    pub fields: BookFields,
}

#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub fields: BookFields,
}

/// Replacement field set for an existing book.
#[derive(Debug, Clone, Default)]
pub struct ReplaceBook {
    pub fields: BookFields,
}

impl NewBook {
    pub fn new(fields: BookFields) -> Self {
        Self {
            fields: strip_id(fields),
        }
    }
}

impl ReplaceBook {
    pub fn new(fields: BookFields) -> Self {
        Self {
            fields: strip_id(fields),
        }
    }
}

/// Splits an update payload into its `_id` and the remaining fields.
///
/// The id may arrive as a JSON number or a numeric string.
pub fn take_id(mut fields: BookFields) -> Result<(BookId, BookFields), MissingId> {
    let id = match fields.remove(ID_FIELD) {
        Some(Value::Number(n)) => n.as_i64().map(BookId::new),
        Some(Value::String(s)) => s.parse::<BookId>().ok(),
        _ => None,
    };
    id.map(|id| (id, fields)).ok_or(MissingId)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a numeric _id is required")]
pub struct MissingId;

fn strip_id(mut fields: BookFields) -> BookFields {
    fields.remove(ID_FIELD);
    fields
}
