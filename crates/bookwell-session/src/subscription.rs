//! The cached subscription snapshot.
//!
//! After a checkout or plan change the client keeps a small projection of
//! the billing subscription so screens can render plan details without a
//! round trip. The snapshot is never used for authorization; the profile's
//! `subscription_active` flag, re-fetched after every mutation, is the
//! source of truth.
//!
//! Billing payloads arrive in two shapes. The current one nests price and
//! period data under the first subscription item:
//!
//! ```text
//! { "id": "sub_1", "status": "active",
//!   "items": { "data": [ { "current_period_start": 1, "current_period_end": 2,
//!                          "price": { "id": "price_1", "unit_amount": 2500,
//!                                     "currency": "usd",
//!                                     "recurring": { "interval": "month",
//!                                                    "interval_count": 1 } } } ] } }
//! ```
//!
//! The legacy one keeps periods at the top level and pricing under `plan`.
//! Each field is read from the nested shape first and the legacy shape
//! second.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SessionError;

/// Locally cached projection of the last known billing subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub id: String,
    pub status: Option<String>,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub price_id: Option<String>,
    pub interval: Option<String>,
    pub interval_count: Option<u64>,
    /// Price in the currency's minor unit (cents).
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub cancel_at: Option<i64>,
}

impl SubscriptionSnapshot {
    /// Projects a raw billing subscription object.
    ///
    /// # Errors
    /// Returns [`SessionError::Subscription`] if the payload isn't an object
    /// or has no string `id`.
    pub fn from_billing(payload: &Value) -> Result<Self, SessionError> {
        if !payload.is_object() {
            return Err(SessionError::Subscription("payload is not an object".into()));
        }
        let id = payload
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SessionError::Subscription("payload has no id".into()))?;

        let item = payload.pointer("/items/data/0");
        let price = item.and_then(|i| i.get("price"));
        let plan = payload.get("plan");

        Ok(Self {
            id: id.to_owned(),
            status: payload.get("status").and_then(string),
            current_period_start: nested_or_legacy(
                item.and_then(|i| i.get("current_period_start")),
                payload.get("current_period_start"),
                Value::as_i64,
            ),
            current_period_end: nested_or_legacy(
                item.and_then(|i| i.get("current_period_end")),
                payload.get("current_period_end"),
                Value::as_i64,
            ),
            price_id: nested_or_legacy(
                price.and_then(|p| p.get("id")),
                plan.and_then(|p| p.get("id")),
                string,
            ),
            interval: nested_or_legacy(
                price.and_then(|p| p.pointer("/recurring/interval")),
                plan.and_then(|p| p.get("interval")),
                string,
            ),
            interval_count: nested_or_legacy(
                price.and_then(|p| p.pointer("/recurring/interval_count")),
                plan.and_then(|p| p.get("interval_count")),
                Value::as_u64,
            ),
            amount: nested_or_legacy(
                price.and_then(|p| p.get("unit_amount")),
                plan.and_then(|p| p.get("amount")),
                Value::as_i64,
            ),
            currency: nested_or_legacy(
                price.and_then(|p| p.get("currency")),
                plan.and_then(|p| p.get("currency")),
                string,
            ),
            cancel_at: payload.get("cancel_at").and_then(Value::as_i64),
        })
    }

    /// Returns `true` if the subscription is scheduled to end.
    pub fn is_canceling(&self) -> bool {
        self.cancel_at.is_some()
    }
}

/// Reads the nested value, falling back to the legacy one when the nested
/// value is missing, null, or of the wrong type.
fn nested_or_legacy<T>(
    nested: Option<&Value>,
    legacy: Option<&Value>,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    nested.and_then(&read).or_else(|| legacy.and_then(&read))
}

fn string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_billing_nested_shape() {
        let payload = json!({
            "id": "sub_1",
            "status": "active",
            "cancel_at": null,
            "items": { "data": [{
                "current_period_start": 100,
                "current_period_end": 200,
                "price": {
                    "id": "price_m",
                    "unit_amount": 2500,
                    "currency": "usd",
                    "recurring": { "interval": "month", "interval_count": 1 }
                }
            }]}
        });

        let snap = SubscriptionSnapshot::from_billing(&payload).expect("should parse");

        assert_eq!(
            snap,
            SubscriptionSnapshot {
                id: "sub_1".into(),
                status: Some("active".into()),
                current_period_start: Some(100),
                current_period_end: Some(200),
                price_id: Some("price_m".into()),
                interval: Some("month".into()),
                interval_count: Some(1),
                amount: Some(2500),
                currency: Some("usd".into()),
                cancel_at: None,
            }
        );
        assert!(!snap.is_canceling());
    }

    #[test]
    fn test_from_billing_legacy_shape() {
        let payload = json!({
            "id": "sub_2",
            "status": "past_due",
            "current_period_start": 10,
            "current_period_end": 20,
            "cancel_at": 20,
            "plan": {
                "id": "plan_y",
                "interval": "year",
                "interval_count": 1,
                "amount": 24000,
                "currency": "eur"
            }
        });

        let snap = SubscriptionSnapshot::from_billing(&payload).unwrap();

        assert_eq!(snap.price_id.as_deref(), Some("plan_y"));
        assert_eq!(snap.interval.as_deref(), Some("year"));
        assert_eq!(snap.amount, Some(24000));
        assert_eq!(snap.currency.as_deref(), Some("eur"));
        assert_eq!(snap.current_period_end, Some(20));
        assert!(snap.is_canceling());
    }

    #[test]
    fn test_from_billing_prefers_nested_over_legacy() {
        // Both shapes present: the nested price wins field by field,
        // and legacy fills whatever the nested shape lacks.
        let payload = json!({
            "id": "sub_3",
            "current_period_end": 999,
            "plan": { "id": "plan_old", "amount": 1000, "currency": "usd" },
            "items": { "data": [{
                "price": { "id": "price_new", "unit_amount": 1500 }
            }]}
        });

        let snap = SubscriptionSnapshot::from_billing(&payload).unwrap();

        assert_eq!(snap.price_id.as_deref(), Some("price_new"));
        assert_eq!(snap.amount, Some(1500));
        assert_eq!(snap.currency.as_deref(), Some("usd"));
        assert_eq!(snap.current_period_end, Some(999));
    }

    #[test]
    fn test_from_billing_null_nested_field_falls_back() {
        let payload = json!({
            "id": "sub_4",
            "plan": { "currency": "gbp" },
            "items": { "data": [{ "price": { "currency": null } }] }
        });

        let snap = SubscriptionSnapshot::from_billing(&payload).unwrap();

        assert_eq!(snap.currency.as_deref(), Some("gbp"));
    }

    #[test]
    fn test_from_billing_mistyped_nested_field_falls_back() {
        let payload = json!({
            "id": "sub_5",
            "plan": { "interval_count": 3, "amount": 900 },
            "items": { "data": [{ "price": {
                "unit_amount": "900",
                "recurring": { "interval_count": "1" }
            } }] }
        });

        let snap = SubscriptionSnapshot::from_billing(&payload).unwrap();

        assert_eq!(snap.interval_count, Some(3));
        assert_eq!(snap.amount, Some(900));
    }

    #[test]
    fn test_from_billing_missing_id_is_rejected() {
        let payload = json!({ "status": "active" });

        assert!(matches!(
            SubscriptionSnapshot::from_billing(&payload),
            Err(SessionError::Subscription(_))
        ));
    }

    #[test]
    fn test_from_billing_non_object_is_rejected() {
        assert!(SubscriptionSnapshot::from_billing(&json!("sub_1")).is_err());
    }

    #[test]
    fn test_snapshot_json_uses_camel_case() {
        let snap = SubscriptionSnapshot {
            id: "sub_1".into(),
            price_id: Some("p".into()),
            ..Default::default()
        };

        let json = serde_json::to_value(&snap).unwrap();

        assert_eq!(json["priceId"], "p");
        assert!(json.get("price_id").is_none());
    }
}
