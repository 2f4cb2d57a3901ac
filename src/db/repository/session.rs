//! Bearer session persistence. Sessions store only the SHA-256 hash of
//! the issued token; losing the database never leaks usable credentials.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_ts, user::row_to_identity};
use crate::db::DatabaseError;
use crate::models::Identity;

pub fn insert_session(
    conn: &Connection,
    token_hash: &str,
    user_id: &Uuid,
    issued_at: NaiveDateTime,
    expires_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, issued_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            token_hash,
            user_id.to_string(),
            format_ts(issued_at),
            format_ts(expires_at),
        ],
    )?;
    Ok(())
}

/// Resolve a token hash to the owning identity, honoring expiry.
/// Returns `None` for unknown or expired tokens; the caller maps that to
/// an authentication failure.
pub fn find_identity_by_token(
    conn: &Connection,
    token_hash: &str,
    now: NaiveDateTime,
) -> Result<Option<Identity>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.email, u.full_name, u.date_of_birth, u.gender, u.phone_number, u.role, u.created_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token_hash = ?1 AND s.expires_at > ?2",
    )?;
    let mut rows = stmt.query_map(params![token_hash, format_ts(now)], row_to_identity)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Drop sessions past their expiry. Returns how many were removed.
pub fn delete_expired(conn: &Connection, now: NaiveDateTime) -> Result<usize, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![format_ts(now)],
    )?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::user::tests::{make_patient, now};
    use crate::db::repository::user::insert_user;
    use crate::db::sqlite::open_memory_database;
    use chrono::Duration;

    #[test]
    fn valid_session_resolves_identity() {
        let conn = open_memory_database().unwrap();
        let user = insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();
        insert_session(&conn, "hash-1", &user.id, now(), now() + Duration::hours(12)).unwrap();

        let identity = find_identity_by_token(&conn, "hash-1", now())
            .unwrap()
            .unwrap();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "p@example.com");
    }

    #[test]
    fn expired_session_does_not_resolve() {
        let conn = open_memory_database().unwrap();
        let user = insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();
        insert_session(&conn, "hash-1", &user.id, now(), now() + Duration::hours(12)).unwrap();

        let later = now() + Duration::hours(13);
        assert!(find_identity_by_token(&conn, "hash-1", later)
            .unwrap()
            .is_none());
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let conn = open_memory_database().unwrap();
        assert!(find_identity_by_token(&conn, "nope", now()).unwrap().is_none());
    }

    #[test]
    fn delete_expired_removes_only_stale_sessions() {
        let conn = open_memory_database().unwrap();
        let user = insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();
        insert_session(&conn, "stale", &user.id, now(), now() + Duration::hours(1)).unwrap();
        insert_session(&conn, "fresh", &user.id, now(), now() + Duration::hours(24)).unwrap();

        let removed = delete_expired(&conn, now() + Duration::hours(2)).unwrap();
        assert_eq!(removed, 1);
        assert!(find_identity_by_token(&conn, "fresh", now() + Duration::hours(2))
            .unwrap()
            .is_some());
    }
}
