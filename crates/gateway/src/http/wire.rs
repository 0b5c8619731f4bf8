//! JSON shapes exchanged with the backend and their mapping to domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use pmp_core::model::{
    DomainStats, DomainTag, PracticeSession, Question, QuestionOption, UserId,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::port::GatewayError;

fn decode<E: core::fmt::Display>(e: E) -> GatewayError {
    GatewayError::Decode(e.to_string())
}

//
// ─── AUTH ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MeResponse {
    pub email: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Error body returned by the backend on validation or auth failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub(crate) fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionEnvelope {
    pub success: bool,
    pub data: Option<QuestionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    pub question_text: String,
    pub options: Vec<OptionDto>,
    pub explanation: String,
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionDto {
    pub text: String,
    pub is_correct: bool,
}

impl QuestionEnvelope {
    pub(crate) fn into_question(self) -> Result<Question, GatewayError> {
        match self {
            QuestionEnvelope {
                success: true,
                data: Some(dto),
            } => dto.into_question(),
            _ => Err(GatewayError::NoQuestion),
        }
    }
}

impl QuestionDto {
    pub(crate) fn into_question(self) -> Result<Question, GatewayError> {
        let domain: DomainTag = self.domain.parse().map_err(decode)?;
        let options = self
            .options
            .into_iter()
            .map(|o| QuestionOption::new(o.text, o.is_correct))
            .collect();
        Question::new(self.question_text, options, self.explanation, domain).map_err(decode)
    }
}

//
// ─── PRACTICE SESSIONS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SessionPayload {
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub personas_total: u32,
    pub personas_correct: u32,
    pub proceso_total: u32,
    pub proceso_correct: u32,
    pub entorno_total: u32,
    pub entorno_correct: u32,
}

impl SessionPayload {
    pub(crate) fn from_session(session: &PracticeSession) -> Self {
        let personas = session.domain(DomainTag::Personas);
        let proceso = session.domain(DomainTag::Proceso);
        let entorno = session.domain(DomainTag::Entorno);
        Self {
            user_id: session.user_id().value(),
            start_time: session.start_time(),
            end_time: session.end_time(),
            personas_total: personas.total,
            personas_correct: personas.correct,
            proceso_total: proceso.total,
            proceso_correct: proceso.correct,
            entorno_total: entorno.total,
            entorno_correct: entorno.correct,
        }
    }
}

/// A stored session as the backend lists it. Missing or `null` counters read as zero.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub user_id: i64,
    #[serde(deserialize_with = "iso_timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "iso_timestamp")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub personas_total: Option<u32>,
    #[serde(default)]
    pub personas_correct: Option<u32>,
    #[serde(default)]
    pub proceso_total: Option<u32>,
    #[serde(default)]
    pub proceso_correct: Option<u32>,
    #[serde(default)]
    pub entorno_total: Option<u32>,
    #[serde(default)]
    pub entorno_correct: Option<u32>,
}

impl SessionRecord {
    pub(crate) fn into_session(self) -> Result<PracticeSession, GatewayError> {
        let stats = |total: Option<u32>, correct: Option<u32>| {
            DomainStats::new(total.unwrap_or_default(), correct.unwrap_or_default())
        };
        PracticeSession::from_persisted(
            self.id,
            UserId::new(self.user_id),
            self.start_time,
            self.end_time,
            stats(self.personas_total, self.personas_correct),
            stats(self.proceso_total, self.proceso_correct),
            stats(self.entorno_total, self.entorno_correct),
        )
        .map_err(decode)
    }
}

/// Decode one element of a history listing on its own, so a bad record does
/// not take the rest of the list down with it.
pub(crate) fn session_from_value(value: Value) -> Result<PracticeSession, GatewayError> {
    serde_json::from_value::<SessionRecord>(value)
        .map_err(decode)?
        .into_session()
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub response: String,
}

//
// ─── TIMESTAMPS ────────────────────────────────────────────────────────────────
//

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, GatewayError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| GatewayError::Decode(format!("invalid timestamp {raw:?}: {e}")))
}

fn iso_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmp_core::model::{QuizAnswer, QuizSession};
    use pmp_core::time::fixed_now;
    use serde_json::json;

    #[test]
    fn question_envelope_maps_to_domain_question() {
        let envelope: QuestionEnvelope = serde_json::from_value(json!({
            "success": true,
            "data": {
                "question_text": "What comes first?",
                "options": [
                    {"text": "Plan", "is_correct": true},
                    {"text": "Execute", "is_correct": false}
                ],
                "explanation": "Plan first.",
                "domain": "proceso"
            }
        }))
        .unwrap();

        let question = envelope.into_question().unwrap();
        assert_eq!(question.domain(), DomainTag::Proceso);
        assert_eq!(question.options().len(), 2);
        assert_eq!(question.correct_index(), 0);
    }

    #[test]
    fn unsuccessful_or_empty_envelope_is_no_question() {
        let envelope: QuestionEnvelope =
            serde_json::from_value(json!({"success": false, "data": null})).unwrap();
        assert_eq!(envelope.into_question().unwrap_err(), GatewayError::NoQuestion);

        let envelope: QuestionEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(envelope.into_question().unwrap_err(), GatewayError::NoQuestion);
    }

    #[test]
    fn malformed_question_is_a_decode_error() {
        let dto: QuestionDto = serde_json::from_value(json!({
            "question_text": "Q",
            "options": [
                {"text": "a", "is_correct": true},
                {"text": "b", "is_correct": true}
            ],
            "explanation": "",
            "domain": "personas"
        }))
        .unwrap();
        assert!(matches!(dto.into_question(), Err(GatewayError::Decode(_))));

        let dto: QuestionDto = serde_json::from_value(json!({
            "question_text": "Q",
            "options": [
                {"text": "a", "is_correct": true},
                {"text": "b", "is_correct": false}
            ],
            "explanation": "",
            "domain": "aleatorio"
        }))
        .unwrap();
        assert!(matches!(dto.into_question(), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn session_payload_flattens_counters() {
        let question = Question::new(
            "Q",
            vec![QuestionOption::new("a", true), QuestionOption::new("b", false)],
            "",
            DomainTag::Personas,
        )
        .unwrap();
        let mut quiz = QuizSession::new(fixed_now());
        quiz.add_answer(QuizAnswer::from_submission(&question, 0).unwrap());
        let record = PracticeSession::from_quiz_session(UserId::new(4), &quiz, fixed_now());

        let value = serde_json::to_value(SessionPayload::from_session(&record)).unwrap();
        assert_eq!(value["user_id"], 4);
        assert_eq!(value["personas_total"], 1);
        assert_eq!(value["personas_correct"], 1);
        assert_eq!(value["proceso_total"], 0);
        assert_eq!(value["entorno_correct"], 0);
        assert_eq!(value["start_time"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn session_record_accepts_naive_timestamps() {
        let record: SessionRecord = serde_json::from_value(json!({
            "id": 12,
            "user_id": 3,
            "start_time": "2024-05-01T10:00:00.123456",
            "end_time": "2024-05-01T10:20:00+00:00",
            "personas_total": 3,
            "personas_correct": 2
        }))
        .unwrap();
        let session = record.into_session().unwrap();
        assert_eq!(session.id(), Some(12));
        assert_eq!(session.domain(DomainTag::Personas), DomainStats::new(3, 2));
        assert_eq!(session.domain(DomainTag::Entorno), DomainStats::default());
        assert!(session.end_time() > session.start_time());
    }

    #[test]
    fn history_element_with_null_counters_reads_as_zero() {
        let session = session_from_value(json!({
            "user_id": 3,
            "start_time": "2024-05-01T10:00:00",
            "end_time": "2024-05-01T10:20:00",
            "personas_total": 2,
            "personas_correct": 1,
            "proceso_total": null,
            "proceso_correct": null
        }))
        .unwrap();
        assert_eq!(session.domain(DomainTag::Proceso), DomainStats::default());
        assert_eq!(session.total_questions(), 2);
    }

    #[test]
    fn history_element_with_bad_timestamp_is_a_decode_error() {
        let err = session_from_value(json!({
            "user_id": 3,
            "start_time": "not-a-date",
            "end_time": "2024-05-01T10:20:00"
        }))
        .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-05-01T10:00:00Z").is_ok());
    }
}
