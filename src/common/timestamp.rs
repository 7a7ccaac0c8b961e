// src/common/timestamp.rs

//! Leitura centralizada de datas gravadas nos documentos.
//!
//! O mesmo campo pode chegar em várias representações: texto RFC 3339,
//! data simples (`YYYY-MM-DD`), milissegundos desde a época Unix ou o objeto
//! `{ seconds, nanoseconds }` do datastore gerenciado. Tudo passa por
//! [`parse_timestamp`]. Valores que não se encaixam em nenhuma forma viram
//! [`Timestamp::Invalid`]; a queda para a época Unix só acontece de forma
//! explícita via [`Timestamp::or_epoch`].

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use validator::ValidationError;

use crate::common::patch::Patch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Valid(DateTime<Utc>),
    /// Valor gravado que não pôde ser interpretado (preservado como texto).
    Invalid(String),
}

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::Valid(Utc::now())
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Valid(dt) => Some(*dt),
            Timestamp::Invalid(_) => None,
        }
    }

    /// Queda documentada: datas inválidas contam como 1970-01-01T00:00:00Z.
    /// Usar apenas para ordenação, nunca para exibição.
    pub fn or_epoch(&self) -> DateTime<Utc> {
        self.as_datetime().unwrap_or(DateTime::UNIX_EPOCH)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid(_))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Valid(dt)
    }
}

/// Chave de ordenação para campos opcionais: ausente e inválido caem na época.
pub fn sort_key(ts: Option<&Timestamp>) -> DateTime<Utc> {
    ts.map(Timestamp::or_epoch).unwrap_or(DateTime::UNIX_EPOCH)
}

pub fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Null => None,
        Value::String(raw) => Some(parse_text(raw)),
        Value::Number(n) => {
            // Números são milissegundos desde a época (Date.getTime()).
            let parsed = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64))
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
            Some(match parsed {
                Some(dt) => Timestamp::Valid(dt),
                None => Timestamp::Invalid(n.to_string()),
            })
        }
        Value::Object(map) => {
            let seconds = map.get("seconds").or_else(|| map.get("_seconds"));
            let nanos = map.get("nanoseconds").or_else(|| map.get("_nanoseconds"));
            let parsed = seconds.and_then(Value::as_i64).and_then(|secs| {
                let ns = nanos.and_then(Value::as_u64).unwrap_or(0);
                u32::try_from(ns)
                    .ok()
                    .and_then(|ns| Utc.timestamp_opt(secs, ns).single())
            });
            Some(match parsed {
                Some(dt) => Timestamp::Valid(dt),
                None => Timestamp::Invalid(value.to_string()),
            })
        }
        other => Some(Timestamp::Invalid(other.to_string())),
    }
}

fn parse_text(raw: &str) -> Timestamp {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Timestamp::Valid(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Timestamp::Valid(Utc.from_utc_datetime(&dt));
        }
    }
    Timestamp::Invalid(raw.to_string())
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::Valid(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Timestamp::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse_timestamp(&value).ok_or_else(|| serde::de::Error::custom("data ausente"))
    }
}

// --- Regras do `validator` para datas recebidas em payloads ---
// `Invalid` só existe para documentos já gravados; entrada nova tem que ser válida.

pub fn validate_input_date(ts: &Timestamp) -> Result<(), ValidationError> {
    if ts.is_valid() {
        return Ok(());
    }
    let mut err = ValidationError::new("invalid_date");
    err.message = Some("Data inválida. Use AAAA-MM-DD ou RFC 3339.".into());
    Err(err)
}

pub fn validate_input_date_patch(patch: &Patch<Timestamp>) -> Result<(), ValidationError> {
    patch.as_set().map_or(Ok(()), validate_input_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_every_stored_representation() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();

        assert_eq!(parse_timestamp(&json!("2024-03-05T10:30:00Z")), Some(Timestamp::Valid(expected)));
        assert_eq!(
            parse_timestamp(&json!("2024-03-05T11:30:00+01:00")),
            Some(Timestamp::Valid(expected))
        );
        assert_eq!(
            parse_timestamp(&json!(expected.timestamp_millis())),
            Some(Timestamp::Valid(expected))
        );
        assert_eq!(
            parse_timestamp(&json!({ "seconds": expected.timestamp(), "nanoseconds": 0 })),
            Some(Timestamp::Valid(expected))
        );
        assert_eq!(
            parse_timestamp(&json!({ "_seconds": expected.timestamp(), "_nanoseconds": 0 })),
            Some(Timestamp::Valid(expected))
        );
    }

    #[test]
    fn date_only_strings_are_midnight_utc() {
        let ts = parse_timestamp(&json!("2024-12-01")).unwrap();
        assert_eq!(ts.as_datetime(), Some(Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn garbage_is_invalid_not_epoch() {
        let ts = parse_timestamp(&json!("ontem à tarde")).unwrap();
        assert_eq!(ts, Timestamp::Invalid("ontem à tarde".to_string()));
        assert!(!ts.is_valid());
        assert_eq!(ts.or_epoch(), DateTime::UNIX_EPOCH);

        assert!(matches!(parse_timestamp(&json!(true)), Some(Timestamp::Invalid(_))));
        assert!(matches!(parse_timestamp(&json!({ "foo": 1 })), Some(Timestamp::Invalid(_))));
        assert_eq!(parse_timestamp(&Value::Null), None);
    }

    #[test]
    fn invalid_values_survive_a_round_trip() {
        let ts: Timestamp = serde_json::from_value(json!("31/02/2024")).unwrap();
        assert_eq!(serde_json::to_value(&ts).unwrap(), json!("31/02/2024"));
    }

    #[test]
    fn missing_values_sort_first() {
        let later = Timestamp::now();
        assert!(sort_key(None) < sort_key(Some(&later)));
    }

    #[test]
    fn payload_dates_must_be_valid() {
        let valid = parse_timestamp(&json!("2024-03-05")).unwrap();
        let garbage = parse_timestamp(&json!("amanhã")).unwrap();

        assert!(validate_input_date(&valid).is_ok());
        let err = validate_input_date(&garbage).unwrap_err();
        assert_eq!(err.code, "invalid_date");

        assert!(validate_input_date_patch(&Patch::Unchanged).is_ok());
        assert!(validate_input_date_patch(&Patch::Clear).is_ok());
        assert!(validate_input_date_patch(&Patch::Set(valid)).is_ok());
        assert!(validate_input_date_patch(&Patch::Set(garbage)).is_err());
    }
}
