use crate::config::ContactConfig;
use crate::models::{ContactMessage, NewContactMessage};
use crate::services::auth::validate_email;
use crate::services::error::ContentError;
use crate::services::posts::timestamp;
use crate::Database;
use anyhow::Result;

const MAX_NAME_LENGTH: usize = 200;
const MAX_SUBJECT_LENGTH: usize = 200;

/// Trims every field and rejects blank or oversized input.
pub fn validate(input: NewContactMessage, config: &ContactConfig) -> Result<NewContactMessage> {
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();
    let message = input.message.trim().to_string();
    let subject = input
        .subject
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if name.is_empty() {
        return Err(ContentError::validation("name is required").into());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ContentError::validation("name is too long").into());
    }
    validate_email(&email).map_err(|e| ContentError::validation(e.to_string()))?;
    if subject
        .as_ref()
        .is_some_and(|s| s.chars().count() > MAX_SUBJECT_LENGTH)
    {
        return Err(ContentError::validation("subject is too long").into());
    }
    if message.is_empty() {
        return Err(ContentError::validation("message is required").into());
    }
    if message.chars().count() > config.max_message_length {
        return Err(ContentError::validation(format!(
            "message must be {} characters or less",
            config.max_message_length
        ))
        .into());
    }

    Ok(NewContactMessage {
        name,
        email,
        subject,
        message,
    })
}

pub fn save_message(db: &Database, input: &NewContactMessage) -> Result<ContactMessage> {
    let conn = db.get()?;
    let created_at = timestamp();
    conn.execute(
        "INSERT INTO contact_messages (name, email, subject, message, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![input.name, input.email, input.subject, input.message, created_at],
    )?;
    Ok(ContactMessage {
        id: conn.last_insert_rowid(),
        name: input.name.clone(),
        email: input.email.clone(),
        subject: input.subject.clone(),
        message: input.message.clone(),
        created_at,
    })
}

pub fn list_messages(db: &Database, limit: usize) -> Result<Vec<ContactMessage>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, name, email, subject, message, created_at FROM contact_messages ORDER BY created_at DESC, id DESC LIMIT ?",
    )?;
    let messages = stmt
        .query_map([limit as i64], |row| {
            Ok(ContactMessage {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                subject: row.get(3)?,
                message: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(messages)
}
