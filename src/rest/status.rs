//! Lifecycle status mapping for command responses.
//!
//! Command endpoints (submit, cancel, ship, ...) return an entity whose
//! `status` is one of a fixed set per resource kind. [`map_to_tagged`] looks
//! the raw status up in that set and produces a [`TaggedResponse`] carrying
//! the status as a Rust enum, so callers can `match` on it exhaustively.
//! An unknown status is an error; the mapper never guesses.
//!
//! On the wire a tagged response serializes with exactly one boolean
//! discriminant, the lowerCamel form of the status:
//!
//! ```json
//! {"id": "shp_1", "object": "shipment", "status": "IN_TRANSIT", "inTransit": true}
//! ```

use std::fmt::Debug;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::rest::ResourceError;

/// A resource kind's fixed lifecycle status enumeration.
///
/// # Example
///
/// ```rust
/// use stateset::rest::ResourceStatus;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// enum TicketStatus {
///     Open,
///     OnHold,
///     Closed,
/// }
///
/// impl ResourceStatus for TicketStatus {
///     const OBJECT: &'static str = "ticket";
///     const ALL: &'static [Self] = &[Self::Open, Self::OnHold, Self::Closed];
///
///     fn as_str(&self) -> &'static str {
///         match self {
///             Self::Open => "OPEN",
///             Self::OnHold => "ON_HOLD",
///             Self::Closed => "CLOSED",
///         }
///     }
/// }
///
/// assert_eq!(TicketStatus::from_wire("ON_HOLD").unwrap(), TicketStatus::OnHold);
/// assert_eq!(TicketStatus::OnHold.discriminant(), "onHold");
/// assert!(TicketStatus::from_wire("BOGUS").is_err());
/// ```
pub trait ResourceStatus: Copy + Eq + Debug + Send + Sync + 'static {
    /// The resource kind literal (the `object` field).
    const OBJECT: &'static str;

    /// Every status in the enumeration.
    const ALL: &'static [Self];

    /// The wire form of this status (e.g. `IN_PROGRESS`).
    fn as_str(&self) -> &'static str;

    /// Looks up a wire status.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnrecognizedStatus`] if `value` is not in [`Self::ALL`].
    fn from_wire(value: &str) -> Result<Self, ResourceError> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ResourceError::UnrecognizedStatus {
                resource: Self::OBJECT,
                status: value.to_string(),
            })
    }

    /// The name of this status's boolean discriminant (e.g. `inProgress`).
    fn discriminant(&self) -> String {
        lower_camel(self.as_str())
    }
}

/// Converts a status name to lowerCamel: `IN_PROGRESS` becomes `inProgress`,
/// `SHIPPED` becomes `shipped`.
///
/// Underscores, hyphens and spaces separate words.
#[must_use]
pub fn lower_camel(status: &str) -> String {
    let mut out = String::with_capacity(status.len());
    for (index, word) in status
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_lowercase();
        if index == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// A command response narrowed to a known lifecycle status.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedResponse<S: ResourceStatus> {
    /// The entity ID.
    pub id: String,
    /// The resource kind literal.
    pub object: &'static str,
    /// The lifecycle status.
    pub status: S,
    /// Remaining entity fields.
    pub entity: Map<String, Value>,
}

impl<S: ResourceStatus> TaggedResponse<S> {
    /// Maps a raw payload, reading the status from its `status` field.
    ///
    /// # Errors
    ///
    /// See [`map_to_tagged`]; a payload without a string `status` is
    /// reported as [`ResourceError::UnrecognizedStatus`] with an empty status.
    pub fn from_payload(payload: Value) -> Result<Self, ResourceError> {
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        map_to_tagged(&status, payload)
    }

    /// Returns `true` if the response is in `status`.
    #[must_use]
    pub fn is(&self, status: S) -> bool {
        self.status == status
    }

    /// Returns an entity field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entity.get(field)
    }
}

impl<S: ResourceStatus> Serialize for TaggedResponse<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let discriminants: Vec<String> = S::ALL.iter().map(S::discriminant).collect();
        let fields = self
            .entity
            .iter()
            .filter(|(key, _)| !discriminants.contains(*key));

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("object", self.object)?;
        map.serialize_entry("status", self.status.as_str())?;
        map.serialize_entry(&self.status.discriminant(), &true)?;
        for (key, value) in fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Maps a raw status and entity to a [`TaggedResponse`].
///
/// The entity's `id`, `object` and `status` fields are lifted out; `id` may
/// be a string or a number.
///
/// # Errors
///
/// - [`ResourceError::UnrecognizedStatus`] if `raw_status` is not one of
///   `S::ALL`
/// - [`ResourceError::Deserialize`] if the entity is not an object or has no `id`
pub fn map_to_tagged<S: ResourceStatus>(
    raw_status: &str,
    raw_entity: Value,
) -> Result<TaggedResponse<S>, ResourceError> {
    let status = S::from_wire(raw_status)?;

    let Value::Object(mut entity) = raw_entity else {
        return Err(ResourceError::deserialize(
            S::OBJECT,
            serde::de::Error::custom("expected a JSON object"),
        ));
    };

    let id = match entity.remove("id") {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(ResourceError::deserialize(
                S::OBJECT,
                serde::de::Error::missing_field("id"),
            ))
        }
    };
    entity.remove("object");
    entity.remove("status");

    Ok(TaggedResponse {
        id,
        object: S::OBJECT,
        status,
        entity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum JobStatus {
        Queued,
        InProgress,
        OnHold,
        Done,
    }

    impl ResourceStatus for JobStatus {
        const OBJECT: &'static str = "job";
        const ALL: &'static [Self] = &[Self::Queued, Self::InProgress, Self::OnHold, Self::Done];

        fn as_str(&self) -> &'static str {
            match self {
                Self::Queued => "QUEUED",
                Self::InProgress => "IN_PROGRESS",
                Self::OnHold => "ON_HOLD",
                Self::Done => "DONE",
            }
        }
    }

    #[test]
    fn test_lower_camel() {
        assert_eq!(lower_camel("SHIPPED"), "shipped");
        assert_eq!(lower_camel("IN_PROGRESS"), "inProgress");
        assert_eq!(lower_camel("ON_HOLD"), "onHold");
        assert_eq!(lower_camel("partially-shipped"), "partiallyShipped");
        assert_eq!(lower_camel("ready for pickup"), "readyForPickup");
    }

    #[test]
    fn test_every_status_maps_to_exactly_one_true_discriminant() {
        for status in JobStatus::ALL {
            let tagged: TaggedResponse<JobStatus> =
                map_to_tagged(status.as_str(), json!({"id": "job_1", "inProgress": false})).unwrap();
            let wire = serde_json::to_value(&tagged).unwrap();
            let object = wire.as_object().unwrap();

            let flags: Vec<&String> = object
                .iter()
                .filter(|(_, v)| v.is_boolean())
                .map(|(k, _)| k)
                .collect();
            assert_eq!(flags, vec![&status.discriminant()]);
            assert_eq!(object[&status.discriminant()], json!(true));
            assert_eq!(object["status"], json!(status.as_str()));
            assert_eq!(object["object"], json!("job"));
        }
    }

    #[test]
    fn test_unrecognized_status_is_rejected() {
        let result = map_to_tagged::<JobStatus>("BOGUS", json!({"id": "job_1"}));
        assert!(matches!(
            result,
            Err(ResourceError::UnrecognizedStatus { resource: "job", ref status }) if status == "BOGUS"
        ));
    }

    #[test]
    fn test_from_payload_reads_status_and_keeps_fields() {
        let tagged = TaggedResponse::<JobStatus>::from_payload(json!({
            "id": 7,
            "object": "job",
            "status": "ON_HOLD",
            "reason": "awaiting stock"
        }))
        .unwrap();

        assert_eq!(tagged.id, "7");
        assert!(tagged.is(JobStatus::OnHold));
        assert_eq!(tagged.get("reason"), Some(&json!("awaiting stock")));
        assert!(tagged.get("status").is_none());
    }

    #[test]
    fn test_missing_status_or_id_is_rejected() {
        assert!(matches!(
            TaggedResponse::<JobStatus>::from_payload(json!({"id": "job_1"})),
            Err(ResourceError::UnrecognizedStatus { .. })
        ));
        assert!(matches!(
            map_to_tagged::<JobStatus>("DONE", json!({"status": "DONE"})),
            Err(ResourceError::Deserialize { .. })
        ));
    }
}
