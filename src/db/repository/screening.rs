//! Screening record persistence. Rows are insert-only: a screening is a
//! timestamped clinical event, never edited after the fact.

use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{bad_column, format_ts, parse_ts};
use crate::db::DatabaseError;
use crate::models::{
    DashboardStats, ResidenceType, RiskLevel, RiskLevelStats, ScreeningInput, ScreeningRecord,
    ScreeningSummary, SmokingStatus, WorkType,
};

/// Draft of a completed screening, before the store assigns id and
/// created_at.
#[derive(Debug, Clone)]
pub struct NewScreening {
    pub user_id: Uuid,
    pub age_at_screening: i32,
    pub input: ScreeningInput,
    pub bmi: f64,
    pub stroke_probability: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub confidence: String,
    pub prediction: i32,
    pub threshold: f64,
}

/// Insert one screening, generating id and created_at. The single insert
/// is the pipeline's only side effect; it either fully lands or the whole
/// screening fails.
pub fn insert_screening(
    conn: &Connection,
    draft: &NewScreening,
    now: NaiveDateTime,
) -> Result<ScreeningRecord, DatabaseError> {
    let id = Uuid::new_v4();
    let risk_factors_json =
        serde_json::to_string(&draft.risk_factors).unwrap_or_else(|_| "[]".into());

    conn.execute(
        "INSERT INTO stroke_screenings (
            id, user_id, age_at_screening, height_cm, weight_kg, bmi,
            hypertension, heart_disease, ever_married, work_type,
            residence_type, avg_glucose_level, smoking_status,
            stroke_probability, risk_level, risk_factors, confidence,
            prediction, threshold, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            id.to_string(),
            draft.user_id.to_string(),
            draft.age_at_screening,
            draft.input.height_cm,
            draft.input.weight_kg,
            draft.bmi,
            draft.input.hypertension,
            draft.input.heart_disease,
            draft.input.ever_married,
            draft.input.work_type.as_str(),
            draft.input.residence_type.as_str(),
            draft.input.avg_glucose_level,
            draft.input.smoking_status.as_str(),
            draft.stroke_probability,
            draft.risk_level.as_str(),
            risk_factors_json,
            draft.confidence,
            draft.prediction,
            draft.threshold,
            format_ts(now),
        ],
    )?;

    Ok(ScreeningRecord {
        id,
        user_id: draft.user_id,
        age_at_screening: draft.age_at_screening,
        height_cm: draft.input.height_cm,
        weight_kg: draft.input.weight_kg,
        bmi: draft.bmi,
        hypertension: draft.input.hypertension,
        heart_disease: draft.input.heart_disease,
        ever_married: draft.input.ever_married,
        work_type: draft.input.work_type,
        residence_type: draft.input.residence_type,
        avg_glucose_level: draft.input.avg_glucose_level,
        smoking_status: draft.input.smoking_status,
        stroke_probability: draft.stroke_probability,
        risk_level: draft.risk_level,
        risk_factors: draft.risk_factors.clone(),
        confidence: draft.confidence.clone(),
        prediction: draft.prediction,
        threshold: draft.threshold,
        created_at: now,
    })
}

const RECORD_COLUMNS: &str = "id, user_id, age_at_screening, height_cm, weight_kg, bmi,
    hypertension, heart_disease, ever_married, work_type, residence_type,
    avg_glucose_level, smoking_status, stroke_probability, risk_level,
    risk_factors, confidence, prediction, threshold, created_at";

/// Screening history for one patient, newest first.
pub fn list_summaries_by_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<ScreeningSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, age_at_screening, bmi, risk_level, stroke_probability, created_at
         FROM stroke_screenings
         WHERE user_id = ?1
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], |row| {
        let id_str: String = row.get(0)?;
        let risk_str: String = row.get(3)?;
        let created_str: String = row.get(5)?;
        Ok(ScreeningSummary {
            id: Uuid::parse_str(&id_str)
                .map_err(|e| bad_column(0, format!("invalid screening id: {e}")))?,
            age_at_screening: row.get(1)?,
            bmi: row.get(2)?,
            risk_level: RiskLevel::from_str(&risk_str)
                .ok_or_else(|| bad_column(3, format!("unknown risk_level: {risk_str}")))?,
            stroke_probability: row.get(4)?,
            created_at: parse_ts(&created_str),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Fetch one screening by id. When `owner` is given, the row must also
/// belong to that user; a mismatch reads as absent, the policy layer
/// decides how to surface that.
pub fn get_by_id(
    conn: &Connection,
    id: &Uuid,
    owner: Option<&Uuid>,
) -> Result<Option<ScreeningRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM stroke_screenings WHERE id = ?1
         AND (?2 IS NULL OR user_id = ?2)"
    );
    let mut stmt = conn.prepare(&sql)?;
    let owner_str = owner.map(Uuid::to_string);
    let mut rows = stmt.query_map(params![id.to_string(), owner_str], row_to_record)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// All screenings for one patient, newest first. Admin detail view.
pub fn list_by_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<ScreeningRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM stroke_screenings
         WHERE user_id = ?1 ORDER BY created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string()], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// High-risk screenings from the last 30 days, newest first.
pub fn recent_high_risk(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<Vec<ScreeningRecord>, DatabaseError> {
    let cutoff = now - Duration::days(30);
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM stroke_screenings
         WHERE risk_level = 'High' AND created_at >= ?1
         ORDER BY created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![format_ts(cutoff)], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Aggregate statistics per risk band.
pub fn risk_level_statistics(conn: &Connection) -> Result<Vec<RiskLevelStats>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT risk_level, COUNT(*), AVG(age_at_screening), AVG(bmi),
                AVG(avg_glucose_level), AVG(stroke_probability),
                SUM(hypertension), SUM(heart_disease)
         FROM stroke_screenings
         GROUP BY risk_level
         ORDER BY CASE risk_level WHEN 'High' THEN 3 WHEN 'Medium' THEN 2 ELSE 1 END DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        let risk_str: String = row.get(0)?;
        Ok(RiskLevelStats {
            risk_level: RiskLevel::from_str(&risk_str)
                .ok_or_else(|| bad_column(0, format!("unknown risk_level: {risk_str}")))?,
            total_count: row.get(1)?,
            avg_age: row.get(2)?,
            avg_bmi: row.get(3)?,
            avg_glucose: row.get(4)?,
            avg_probability: row.get(5)?,
            hypertension_count: row.get(6)?,
            heart_disease_count: row.get(7)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Overview counters for the admin landing page.
pub fn dashboard_stats(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<DashboardStats, DatabaseError> {
    let total_patients: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = 'PATIENT'",
        [],
        |row| row.get(0),
    )?;
    let total_screenings: i64 =
        conn.query_row("SELECT COUNT(*) FROM stroke_screenings", [], |row| row.get(0))?;
    let high_risk_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM stroke_screenings WHERE risk_level = 'High'",
        [],
        |row| row.get(0),
    )?;
    let week_cutoff = format_ts(now - Duration::days(7));
    let recent_screenings_7days: i64 = conn.query_row(
        "SELECT COUNT(*) FROM stroke_screenings WHERE created_at >= ?1",
        params![week_cutoff],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        total_patients,
        total_screenings,
        high_risk_count,
        recent_screenings_7days,
    })
}

fn row_to_record(row: &rusqlite::Row) -> Result<ScreeningRecord, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let user_str: String = row.get(1)?;
    let work_str: String = row.get(9)?;
    let residence_str: String = row.get(10)?;
    let smoking_str: String = row.get(12)?;
    let risk_str: String = row.get(14)?;
    let factors_json: String = row.get(15)?;
    let created_str: String = row.get(19)?;

    Ok(ScreeningRecord {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| bad_column(0, format!("invalid screening id: {e}")))?,
        user_id: Uuid::parse_str(&user_str)
            .map_err(|e| bad_column(1, format!("invalid user id: {e}")))?,
        age_at_screening: row.get(2)?,
        height_cm: row.get(3)?,
        weight_kg: row.get(4)?,
        bmi: row.get(5)?,
        hypertension: row.get(6)?,
        heart_disease: row.get(7)?,
        ever_married: row.get(8)?,
        // Lossy by policy: unknown stored categories fall back to the
        // model's default encodings and are logged as anomalies.
        work_type: WorkType::parse_lossy(&work_str),
        residence_type: ResidenceType::parse_lossy(&residence_str),
        avg_glucose_level: row.get(11)?,
        smoking_status: SmokingStatus::parse_lossy(&smoking_str),
        stroke_probability: row.get(13)?,
        risk_level: RiskLevel::from_str(&risk_str)
            .ok_or_else(|| bad_column(14, format!("unknown risk_level: {risk_str}")))?,
        risk_factors: serde_json::from_str(&factors_json).unwrap_or_default(),
        confidence: row.get(16)?,
        prediction: row.get(17)?,
        threshold: row.get(18)?,
        created_at: parse_ts(&created_str),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::repository::user::tests::{make_patient, now};
    use crate::db::repository::user::insert_user;
    use crate::db::sqlite::open_memory_database;
    use crate::models::screening::sample_input;

    pub(crate) fn make_draft(user_id: Uuid, probability: f64, risk: RiskLevel) -> NewScreening {
        NewScreening {
            user_id,
            age_at_screening: 40,
            input: sample_input(),
            bmi: 24.2,
            stroke_probability: probability,
            risk_level: risk,
            risk_factors: vec!["age".into(), "avg_glucose_level".into()],
            confidence: "High".into(),
            prediction: i32::from(probability >= 0.5),
            threshold: 0.5,
        }
    }

    fn seeded_patient(conn: &Connection, email: &str) -> Uuid {
        insert_user(conn, &make_patient(email), now()).unwrap().id
    }

    #[test]
    fn insert_returns_full_record() {
        let conn = open_memory_database().unwrap();
        let user_id = seeded_patient(&conn, "p@example.com");

        let record =
            insert_screening(&conn, &make_draft(user_id, 0.82, RiskLevel::High), now()).unwrap();
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.created_at, now());

        let fetched = get_by_id(&conn, &record.id, None).unwrap().unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.risk_factors, vec!["age", "avg_glucose_level"]);
        assert_eq!(fetched.threshold, 0.5);
    }

    #[test]
    fn history_is_newest_first() {
        let conn = open_memory_database().unwrap();
        let user_id = seeded_patient(&conn, "p@example.com");

        let t1 = now();
        let t2 = now() + Duration::minutes(5);
        insert_screening(&conn, &make_draft(user_id, 0.2, RiskLevel::Low), t1).unwrap();
        let newer =
            insert_screening(&conn, &make_draft(user_id, 0.5, RiskLevel::Medium), t2).unwrap();

        let summaries = list_summaries_by_user(&conn, &user_id).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, newer.id);
        assert_eq!(summaries[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn owner_filter_hides_other_patients_rows() {
        let conn = open_memory_database().unwrap();
        let alice = seeded_patient(&conn, "alice@example.com");
        let bob = seeded_patient(&conn, "bob@example.com");

        let record =
            insert_screening(&conn, &make_draft(alice, 0.3, RiskLevel::Low), now()).unwrap();

        assert!(get_by_id(&conn, &record.id, Some(&alice)).unwrap().is_some());
        assert!(get_by_id(&conn, &record.id, Some(&bob)).unwrap().is_none());
        assert!(get_by_id(&conn, &record.id, None).unwrap().is_some());
    }

    #[test]
    fn recent_high_risk_respects_window_and_band() {
        let conn = open_memory_database().unwrap();
        let user_id = seeded_patient(&conn, "p@example.com");

        let old = now() - Duration::days(45);
        insert_screening(&conn, &make_draft(user_id, 0.9, RiskLevel::High), old).unwrap();
        insert_screening(&conn, &make_draft(user_id, 0.2, RiskLevel::Low), now()).unwrap();
        let fresh_high =
            insert_screening(&conn, &make_draft(user_id, 0.8, RiskLevel::High), now()).unwrap();

        let recent = recent_high_risk(&conn, now()).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, fresh_high.id);
    }

    #[test]
    fn statistics_aggregate_per_band() {
        let conn = open_memory_database().unwrap();
        let user_id = seeded_patient(&conn, "p@example.com");

        let mut hyper = make_draft(user_id, 0.75, RiskLevel::High);
        hyper.input.hypertension = true;
        insert_screening(&conn, &hyper, now()).unwrap();
        insert_screening(&conn, &make_draft(user_id, 0.85, RiskLevel::High), now()).unwrap();
        insert_screening(&conn, &make_draft(user_id, 0.1, RiskLevel::Low), now()).unwrap();

        let stats = risk_level_statistics(&conn).unwrap();
        assert_eq!(stats.len(), 2);
        // Ordered High before Low
        assert_eq!(stats[0].risk_level, RiskLevel::High);
        assert_eq!(stats[0].total_count, 2);
        assert_eq!(stats[0].hypertension_count, 1);
        assert!((stats[0].avg_probability - 0.8).abs() < 1e-9);
        assert_eq!(stats[1].risk_level, RiskLevel::Low);
        assert_eq!(stats[1].total_count, 1);
    }

    #[test]
    fn dashboard_counts() {
        let conn = open_memory_database().unwrap();
        let user_id = seeded_patient(&conn, "p@example.com");

        insert_screening(
            &conn,
            &make_draft(user_id, 0.9, RiskLevel::High),
            now() - Duration::days(10),
        )
        .unwrap();
        insert_screening(&conn, &make_draft(user_id, 0.2, RiskLevel::Low), now()).unwrap();

        let stats = dashboard_stats(&conn, now()).unwrap();
        assert_eq!(stats.total_patients, 1);
        assert_eq!(stats.total_screenings, 2);
        assert_eq!(stats.high_risk_count, 1);
        assert_eq!(stats.recent_screenings_7days, 1);
    }

    #[test]
    fn legacy_category_reads_back_with_default_encoding() {
        let conn = open_memory_database().unwrap();
        let user_id = seeded_patient(&conn, "p@example.com");
        let record =
            insert_screening(&conn, &make_draft(user_id, 0.3, RiskLevel::Low), now()).unwrap();

        // Simulate a row written before a category was renamed
        conn.execute(
            "UPDATE stroke_screenings SET work_type = 'Retired' WHERE id = ?1",
            params![record.id.to_string()],
        )
        .unwrap();

        let fetched = get_by_id(&conn, &record.id, None).unwrap().unwrap();
        assert_eq!(fetched.work_type, WorkType::Private);
    }
}
