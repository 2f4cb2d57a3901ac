//! User account persistence.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{bad_column, format_date, format_ts, parse_date, parse_ts};
use crate::db::DatabaseError;
use crate::models::{Gender, Identity, PatientSummary, RiskLevel, UserRole};

/// Draft for a new account row. The password is already hashed by the
/// caller; this layer never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub role: UserRole,
}

/// Insert a new user, generating id and created_at.
/// A duplicate email maps to `Conflict`.
pub fn insert_user(
    conn: &Connection,
    new: &NewUser,
    now: NaiveDateTime,
) -> Result<Identity, DatabaseError> {
    let id = Uuid::new_v4();
    let result = conn.execute(
        "INSERT INTO users (id, email, password_hash, full_name, date_of_birth, gender, phone_number, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id.to_string(),
            new.email,
            new.password_hash,
            new.full_name,
            format_date(new.date_of_birth),
            new.gender.as_str(),
            new.phone_number,
            new.role.as_str(),
            format_ts(now),
        ],
    );

    match result {
        Ok(_) => Ok(Identity {
            id,
            email: new.email.clone(),
            full_name: new.full_name.clone(),
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            phone_number: new.phone_number.clone(),
            role: new.role,
            created_at: now,
        }),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::Conflict("Email already registered".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fetch a user by email along with the stored password hash, for login.
pub fn find_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<(Identity, String)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, email, full_name, date_of_birth, gender, phone_number, role, created_at, password_hash
         FROM users WHERE email = ?1",
    )?;
    let mut rows = stmt.query_map(params![email], |row| {
        let identity = row_to_identity(row)?;
        let hash: String = row.get(8)?;
        Ok((identity, hash))
    })?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn find_by_id(conn: &Connection, id: &Uuid) -> Result<Option<Identity>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, email, full_name, date_of_birth, gender, phone_number, role, created_at
         FROM users WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id.to_string()], row_to_identity)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Whether a PATIENT account with this id exists. Admin listings use this
/// to distinguish "unknown patient" from "patient with no screenings".
pub fn patient_exists(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE id = ?1 AND role = 'PATIENT'",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All patients with their screening rollups, most recently screened first.
/// Patients who have never screened sort last (SQLite puts NULL smallest).
pub fn list_patient_summaries(conn: &Connection) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.full_name, u.email, u.date_of_birth, u.gender,
                COUNT(s.id) AS total_screenings,
                MAX(s.created_at) AS last_screening_date,
                MAX(CASE s.risk_level WHEN 'High' THEN 3 WHEN 'Medium' THEN 2 WHEN 'Low' THEN 1 END) AS highest_rank
         FROM users u
         LEFT JOIN stroke_screenings s ON s.user_id = u.id
         WHERE u.role = 'PATIENT'
         GROUP BY u.id
         ORDER BY last_screening_date DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        let id_str: String = row.get(0)?;
        let dob_str: String = row.get(3)?;
        let gender_str: String = row.get(4)?;
        let last_str: Option<String> = row.get(6)?;
        let highest_rank: Option<i64> = row.get(7)?;

        Ok(PatientSummary {
            id: Uuid::parse_str(&id_str)
                .map_err(|e| bad_column(0, format!("invalid user id: {e}")))?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            date_of_birth: parse_date(&dob_str),
            gender: Gender::from_str(&gender_str)
                .ok_or_else(|| bad_column(4, format!("unknown gender: {gender_str}")))?,
            total_screenings: row.get(5)?,
            last_screening_date: last_str.map(|s| parse_ts(&s)),
            highest_risk_level: highest_rank.map(|r| match r {
                3 => RiskLevel::High,
                2 => RiskLevel::Medium,
                _ => RiskLevel::Low,
            }),
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub(crate) fn row_to_identity(row: &rusqlite::Row) -> Result<Identity, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let dob_str: String = row.get(3)?;
    let gender_str: String = row.get(4)?;
    let role_str: String = row.get(6)?;
    let created_str: String = row.get(7)?;

    Ok(Identity {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| bad_column(0, format!("invalid user id: {e}")))?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        date_of_birth: parse_date(&dob_str),
        gender: Gender::from_str(&gender_str)
            .ok_or_else(|| bad_column(4, format!("unknown gender: {gender_str}")))?,
        phone_number: row.get(5)?,
        role: UserRole::from_str(&role_str)
            .ok_or_else(|| bad_column(6, format!("unknown role: {role_str}")))?,
        created_at: parse_ts(&created_str),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    pub(crate) fn make_patient(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "pbkdf2$600000$c2FsdA$aGFzaA".into(),
            full_name: "Test Patient".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            gender: Gender::Female,
            phone_number: None,
            role: UserRole::Patient,
        }
    }

    pub(crate) fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn insert_and_find_by_email() {
        let conn = open_memory_database().unwrap();
        let created = insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();

        let (found, hash) = find_by_email(&conn, "p@example.com").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Patient);
        assert_eq!(hash, "pbkdf2$600000$c2FsdA$aGFzaA");
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();
        let err = insert_user(&conn, &make_patient("p@example.com"), now()).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[test]
    fn find_by_id_round_trips() {
        let conn = open_memory_database().unwrap();
        let created = insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();
        let found = find_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(found.email, "p@example.com");
        assert_eq!(found.date_of_birth, created.date_of_birth);
    }

    #[test]
    fn unknown_id_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(find_by_id(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn patient_exists_ignores_admins() {
        let conn = open_memory_database().unwrap();
        let mut admin = make_patient("admin@example.com");
        admin.role = UserRole::Admin;
        let admin_id = insert_user(&conn, &admin, now()).unwrap().id;
        let patient_id = insert_user(&conn, &make_patient("p@example.com"), now())
            .unwrap()
            .id;

        assert!(patient_exists(&conn, &patient_id).unwrap());
        assert!(!patient_exists(&conn, &admin_id).unwrap());
    }

    #[test]
    fn patient_summaries_exclude_admins() {
        let conn = open_memory_database().unwrap();
        let mut admin = make_patient("admin@example.com");
        admin.role = UserRole::Admin;
        insert_user(&conn, &admin, now()).unwrap();
        insert_user(&conn, &make_patient("p@example.com"), now()).unwrap();

        let summaries = list_patient_summaries(&conn).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].email, "p@example.com");
        assert_eq!(summaries[0].total_screenings, 0);
        assert!(summaries[0].last_screening_date.is_none());
        assert!(summaries[0].highest_risk_level.is_none());
    }
}
