//! Shooting session persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::analysis::{FormAnalysisResult, FormGrade, FormIssue, VideoMetadata};
use crate::progress::{ShootingSession, SyncStatus};
use crate::storage::database::{Database, DatabaseError};

/// Reads and records shooting sessions.
pub struct SessionStore {
    db: Arc<Database>,
}

type SessionRow = (String, String, String, f64, String, String, String, Option<String>, String);

impl SessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a session.
    pub fn record_session(&self, session: &ShootingSession) -> Result<(), DatabaseError> {
        let issues_json = serde_json::to_string(&session.detected_issues)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let analysis_json = serde_json::to_string(&session.form_analysis)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let metadata_json = session
            .video_metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO shooting_sessions
                 (id, user_id, timestamp, duration_secs, form_score, detected_issues_json,
                  form_analysis_json, video_metadata_json, sync_status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    session.id.to_string(),
                    session.user_id.to_string(),
                    session.timestamp.to_rfc3339(),
                    session.duration_secs as f64,
                    session.form_score.as_str(),
                    issues_json,
                    analysis_json,
                    metadata_json,
                    session.sync_status.as_str(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            Ok(())
        })
    }

    /// All sessions for a user, oldest first.
    pub fn sessions_for_user(&self, user_id: Uuid) -> Result<Vec<ShootingSession>, DatabaseError> {
        let rows: Vec<SessionRow> = self.db.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, timestamp, duration_secs, form_score, detected_issues_json,
                            form_analysis_json, video_metadata_json, sync_status
                     FROM shooting_sessions
                     WHERE user_id = ?1
                     ORDER BY timestamp ASC",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            let rows = stmt
                .query_map(params![user_id.to_string()], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                        row.get(8)?,
                    ))
                })
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            Ok(rows)
        })?;

        rows.into_iter().map(row_to_session).collect()
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::DeserializationError(e.to_string()))
}

fn parse_grade(s: &str) -> Result<FormGrade, DatabaseError> {
    match s {
        "A" => Ok(FormGrade::A),
        "B" => Ok(FormGrade::B),
        "C" => Ok(FormGrade::C),
        "D" => Ok(FormGrade::D),
        "F" => Ok(FormGrade::F),
        other => Err(DatabaseError::DeserializationError(format!("unknown grade '{}'", other))),
    }
}

fn row_to_session(row: SessionRow) -> Result<ShootingSession, DatabaseError> {
    let (id, user_id, timestamp, duration, score, issues, analysis, metadata, sync) = row;

    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?
        .with_timezone(&Utc);
    let detected_issues: Vec<FormIssue> = serde_json::from_str(&issues)
        .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;
    let form_analysis: FormAnalysisResult = serde_json::from_str(&analysis)
        .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;
    let video_metadata: Option<VideoMetadata> = metadata
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

    Ok(ShootingSession {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        timestamp,
        duration_secs: duration as f32,
        form_score: parse_grade(&score)?,
        detected_issues,
        form_analysis,
        video_metadata,
        sync_status: SyncStatus::from_stored(&sync),
    })
}
