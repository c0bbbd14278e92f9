//! Records exchanged with the association backend.
//!
//! The backend speaks Spanish field names (`nombre`, `id_rama`, `datos`, ...);
//! the Rust side uses English names and maps them with `serde(rename)`.

use crate::utils::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// The `{ ok, datos, mensaje }` shape every backend call resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(rename = "datos")]
    pub data: Option<T>,
    #[serde(rename = "mensaje")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
    }

    /// Payload of a successful envelope; failures become `AppError::BackendError`.
    pub fn into_result(self) -> Result<T> {
        if !self.ok {
            return Err(AppError::backend(self.message_or("Server error")));
        }
        self.data
            .ok_or_else(|| AppError::backend("The server response carried no data"))
    }

    /// For mutations whose payload is irrelevant: the server message on success.
    pub fn into_ack(self) -> Result<String> {
        if self.ok {
            Ok(self.message.unwrap_or_default())
        } else {
            Err(AppError::backend(self.message_or("Server error")))
        }
    }
}

impl<T: serde::de::DeserializeOwned> Envelope<T> {
    /// Types a normalized envelope value. A body that does not fit `T` becomes
    /// a failure envelope, so callers still never see a decode error.
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Unexpected response payload: {}", e);
                Self::failure(format!("Unexpected response payload: {}", e))
            }
        }
    }
}

/// Rama: scientific branch used to classify clubs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(rename = "id_rama")]
    pub id: i64,
    #[serde(rename = "nombre_rama")]
    pub name: String,
}

/// Club name as joined by the backend under `id_club_CLUB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubRef {
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(rename = "id_club")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "id_rama")]
    pub branch_id: i64,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "fecha_fundacion", deserialize_with = "de_date")]
    pub founded_on: NaiveDate,
    #[serde(rename = "presupuesto_anual", default, deserialize_with = "de_number")]
    pub annual_budget: f64,
    #[serde(rename = "esta_activo", default, deserialize_with = "de_flag")]
    pub active: bool,
}

/// Socio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "id_socio")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "id_club")]
    pub club_id: i64,
    #[serde(rename = "fecha_nacimiento", deserialize_with = "de_date")]
    pub birth_date: NaiveDate,
    #[serde(rename = "altura_metros", default, deserialize_with = "de_opt_number")]
    pub height_m: Option<f64>,
    #[serde(rename = "ha_pagado_cuota", default, deserialize_with = "de_flag")]
    pub dues_paid: bool,
    #[serde(rename = "id_club_CLUB", default, skip_serializing_if = "Option::is_none")]
    pub club: Option<ClubRef>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One bar of the members-per-club chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMemberCount {
    #[serde(rename = "id_club", default)]
    pub club_id: Option<i64>,
    #[serde(deserialize_with = "de_count")]
    pub total: u64,
    #[serde(rename = "id_club_CLUB", default)]
    pub club: Option<ClubRef>,
}

impl ClubMemberCount {
    pub fn label(&self) -> String {
        match (&self.club, self.club_id) {
            (Some(club), _) => club.name.clone(),
            (None, Some(id)) => format!("#{}", id),
            (None, None) => "?".to_string(),
        }
    }
}

/// Editable club form. References and dates stay optional until validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "id_rama")]
    pub branch_id: Option<i64>,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "fecha_fundacion")]
    pub founded_on: Option<NaiveDate>,
    #[serde(rename = "presupuesto_anual")]
    pub annual_budget: f64,
    #[serde(rename = "esta_activo")]
    pub active: bool,
}

impl Default for ClubDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            branch_id: None,
            description: String::new(),
            address: String::new(),
            founded_on: None,
            annual_budget: 0.0,
            active: true,
        }
    }
}

impl From<&Club> for ClubDraft {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            branch_id: Some(club.branch_id),
            description: club.description.clone(),
            address: club.address.clone(),
            founded_on: Some(club.founded_on),
            annual_budget: club.annual_budget,
            active: club.active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberDraft {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "id_club")]
    pub club_id: Option<i64>,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "altura_metros")]
    pub height_m: Option<f64>,
    #[serde(rename = "ha_pagado_cuota")]
    pub dues_paid: bool,
}

impl From<&Member> for MemberDraft {
    fn from(member: &Member) -> Self {
        Self {
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            email: member.email.clone(),
            club_id: Some(member.club_id),
            birth_date: Some(member.birth_date),
            height_m: member.height_m,
            dues_paid: member.dues_paid,
        }
    }
}

/// Inclusive birth-date window for the member search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BirthDateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl BirthDateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

// SQL decimals and dates arrive as strings from most backends; accept both shapes.

fn de_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    Ok(de_opt_number(d)?.unwrap_or(0.0))
}

fn de_opt_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    use serde::de::Error;
    match Option::<Lenient>::deserialize(d)? {
        None => Ok(None),
        Some(Lenient::Int(n)) => Ok(Some(n as f64)),
        Some(Lenient::Float(n)) => Ok(Some(n)),
        Some(Lenient::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Lenient::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("not a number: {:?}", s))),
        Some(Lenient::Bool(b)) => Err(D::Error::custom(format!("not a number: {}", b))),
    }
}

fn de_count<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    use serde::de::Error;
    match de_opt_number(d)? {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as u64),
        Some(n) => Err(D::Error::custom(format!("not a count: {}", n))),
        None => Ok(0),
    }
}

fn de_flag<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    use serde::de::Error;
    match Option::<Lenient>::deserialize(d)? {
        None => Ok(false),
        Some(Lenient::Bool(b)) => Ok(b),
        Some(Lenient::Int(n)) => Ok(n != 0),
        Some(Lenient::Float(n)) => Ok(n != 0.0),
        Some(Lenient::Text(s)) => match s.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(D::Error::custom(format!("not a flag: {:?}", other))),
        },
    }
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<NaiveDate, D::Error> {
    use serde::de::Error;
    let raw = String::deserialize(d)?;
    // Timestamps such as 2001-05-04T00:00:00.000Z keep only their date part.
    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| D::Error::custom(format!("invalid date {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_club_from_backend_json() {
        let club: Club = serde_json::from_value(json!({
            "id_club": 3,
            "nombre": "Astronomía Norte",
            "id_rama": 2,
            "descripcion": "Observación del cielo nocturno",
            "direccion": "Calle Mayor 12, Sevilla",
            "fecha_fundacion": "1999-04-01",
            "presupuesto_anual": "1500.50",
            "esta_activo": 1
        }))
        .unwrap();

        assert_eq!(club.id, 3);
        assert_eq!(club.branch_id, 2);
        assert_eq!(club.founded_on, NaiveDate::from_ymd_opt(1999, 4, 1).unwrap());
        assert_eq!(club.annual_budget, 1500.5);
        assert!(club.active);
    }

    #[test]
    fn test_member_with_joined_club_and_timestamp_date() {
        let member: Member = serde_json::from_value(json!({
            "id_socio": 7,
            "nombre": "Lucía",
            "apellido": "Pérez",
            "email": "lucia@example.com",
            "id_club": 3,
            "fecha_nacimiento": "2001-05-04T00:00:00.000Z",
            "altura_metros": null,
            "ha_pagado_cuota": false,
            "id_club_CLUB": { "nombre": "Astronomía Norte" }
        }))
        .unwrap();

        assert_eq!(member.birth_date, NaiveDate::from_ymd_opt(2001, 5, 4).unwrap());
        assert_eq!(member.height_m, None);
        assert_eq!(member.club.unwrap().name, "Astronomía Norte");
        assert_eq!(member.first_name, "Lucía");
    }

    #[test]
    fn test_draft_serializes_backend_field_names() {
        let draft = MemberDraft {
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            email: "ana@example.com".into(),
            club_id: Some(4),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 2),
            height_m: Some(1.7),
            dues_paid: true,
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["nombre"], "Ana");
        assert_eq!(value["id_club"], 4);
        assert_eq!(value["fecha_nacimiento"], "1990-01-02");
        assert_eq!(value["ha_pagado_cuota"], true);
    }

    #[test]
    fn test_envelope_into_result() {
        let ok: Envelope<Vec<Branch>> = Envelope::from_value(json!({
            "ok": true,
            "datos": [{ "id_rama": 1, "nombre_rama": "Física" }],
            "mensaje": "Ramas recuperadas"
        }));
        assert_eq!(ok.into_result().unwrap()[0].name, "Física");

        let failed: Envelope<Vec<Branch>> =
            Envelope::from_value(json!({ "ok": false, "datos": null, "mensaje": "Sin conexión" }));
        assert_eq!(failed.into_result().unwrap_err().to_string(), "Sin conexión");
    }

    #[test]
    fn test_envelope_with_wrong_payload_shape_becomes_failure() {
        let envelope: Envelope<Vec<Club>> =
            Envelope::from_value(json!({ "ok": true, "datos": { "not": "a list" } }));
        assert!(!envelope.ok);
        assert!(envelope.message.unwrap().starts_with("Unexpected response payload"));
    }

    #[test]
    fn test_envelope_decodes_single_record_without_optional_keys() {
        let envelope: Envelope<Club> = Envelope::from_value(json!({
            "ok": true,
            "datos": {
                "id_club": 9,
                "nombre": "Geología Sur",
                "id_rama": 4,
                "fecha_fundacion": "2010-09-15"
            }
        }));
        assert!(envelope.ok);
        assert_eq!(envelope.message, None);
        let club = envelope.into_result().unwrap();
        assert_eq!(club.id, 9);
        assert_eq!(club.name, "Geología Sur");

        let bare: Envelope<Club> = Envelope::from_value(json!({ "ok": true }));
        assert!(bare.ok);
        assert_eq!(bare.data, None);
        assert_eq!(bare.message, None);
    }

    #[test]
    fn test_chart_count_accepts_string_totals() {
        let row: ClubMemberCount = serde_json::from_value(json!({
            "id_club": 1,
            "total": "12",
            "id_club_CLUB": { "nombre": "Química" }
        }))
        .unwrap();
        assert_eq!(row.total, 12);
        assert_eq!(row.label(), "Química");
    }
}
