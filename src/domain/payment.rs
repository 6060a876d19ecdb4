use super::money::lenient_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// An order/payment record as returned by the upstream POS API.
///
/// Every field is optional upstream. The accessor methods apply the
/// default-substitution rule for each field so the transformer never has
/// to deal with missing data itself.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub bill_invoice: Option<Value>,
    #[serde(default)]
    pub pos_bill_id: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub tax: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub service_charge: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub sub_total: Option<Decimal>,
    #[serde(default)]
    pub mode: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bill_items: Vec<LineItem>,
}

/// One dish/quantity entry of a payment.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LineItem {
    #[serde(default)]
    pub dish: Option<Dish>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub pos_dish_id: Option<Value>,
    #[serde(default, rename = "_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub category_ids: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders an upstream identifier or label as text.
///
/// `{"$oid": ".."}` wrappers are unwrapped; `null` and empty strings are
/// treated as absent.
pub fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(oid)) => oid.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

impl Payment {
    /// `billInvoice`, else `posBillId`, else empty.
    pub fn receipt_number(&self) -> String {
        self.bill_invoice
            .as_ref()
            .and_then(value_text)
            .or_else(|| self.pos_bill_id.as_ref().and_then(value_text))
            .unwrap_or_default()
    }

    /// Raw timestamp source: `createdAt` (unwrapped later), else `date`.
    pub fn timestamp_source(&self) -> Option<&Value> {
        [self.created_at.as_ref(), self.date.as_ref()]
            .into_iter()
            .flatten()
            .find(|v| !v.is_null() && v.as_str() != Some(""))
    }

    pub fn invoice_total(&self) -> Decimal {
        self.total.unwrap_or_default()
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax.unwrap_or_default()
    }

    pub fn service_charge_amount(&self) -> Decimal {
        self.service_charge.unwrap_or_default()
    }

    pub fn discount_amount(&self) -> Decimal {
        self.discount.unwrap_or_default()
    }

    /// `subTotal` when given, else `total - tax`.
    pub fn pre_tax_total(&self) -> Decimal {
        self.sub_total
            .unwrap_or_else(|| self.invoice_total() - self.tax_amount())
    }

    /// Upper-cased payment mode, `CASH` when absent.
    pub fn payment_name(&self) -> String {
        self.mode
            .as_ref()
            .and_then(value_text)
            .map(|mode| mode.to_uppercase())
            .unwrap_or_else(|| "CASH".to_string())
    }
}

impl LineItem {
    pub fn unit_price(&self) -> Decimal {
        self.dish
            .as_ref()
            .and_then(|dish| dish.price)
            .unwrap_or_default()
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity.unwrap_or_default()
    }

    pub fn discount_amount(&self) -> Decimal {
        self.discount.unwrap_or_default()
    }

    /// Price times quantity. Reported as the tax-inclusive line amount.
    pub fn net_amount(&self) -> Decimal {
        self.unit_price()
            .checked_mul(self.quantity())
            .unwrap_or_default()
    }

    /// Share of the payment's tax attributable to this line.
    ///
    /// Zero when the payment's pre-tax total is not positive.
    pub fn allocated_tax(&self, payment: &Payment) -> Decimal {
        let base = payment.pre_tax_total();
        if base <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.net_amount()
            .checked_mul(payment.tax_amount())
            .and_then(|scaled| scaled.checked_div(base))
            .unwrap_or_default()
    }

    pub fn item_code(&self) -> String {
        self.dish
            .as_ref()
            .and_then(|dish| dish.pos_dish_id.as_ref().or(dish.id.as_ref()))
            .and_then(value_text)
            .unwrap_or_default()
    }

    /// Dish name, `Unknown` when absent.
    ///
    /// An empty name is treated as absent too, so the export never carries a
    /// blank `ITEM_NAME`.
    pub fn item_name(&self) -> String {
        self.dish
            .as_ref()
            .and_then(|dish| dish.name.as_ref())
            .and_then(value_text)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Comma-joined `categoryIds`, else `category`, else `General`.
    pub fn category(&self) -> String {
        let Some(dish) = self.dish.as_ref() else {
            return "General".to_string();
        };
        if let Some(Value::Array(ids)) = &dish.category_ids {
            let joined = ids
                .iter()
                .map(|id| value_text(id).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",");
            if !joined.is_empty() {
                return joined;
            }
        }
        dish.category
            .as_ref()
            .and_then(value_text)
            .unwrap_or_else(|| "General".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn item(raw: Value) -> LineItem {
        serde_json::from_value(raw).unwrap()
    }

    fn payment(raw: Value) -> Payment {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_receipt_number_fallbacks() {
        assert_eq!(payment(json!({ "billInvoice": 123 })).receipt_number(), "123");
        assert_eq!(
            payment(json!({ "billInvoice": "", "posBillId": "X9" })).receipt_number(),
            "X9"
        );
        assert_eq!(payment(json!({ "posBillId": "X9" })).receipt_number(), "X9");
        assert_eq!(payment(json!({})).receipt_number(), "");
    }

    #[test]
    fn test_category_resolution() {
        let both = item(json!({ "dish": { "categoryIds": ["a", "b"], "category": "Drinks" } }));
        assert_eq!(both.category(), "a,b");

        let named = item(json!({ "dish": { "category": "Drinks" } }));
        assert_eq!(named.category(), "Drinks");

        let empty_ids = item(json!({ "dish": { "categoryIds": [], "category": "Drinks" } }));
        assert_eq!(empty_ids.category(), "Drinks");

        assert_eq!(item(json!({ "dish": {} })).category(), "General");
        assert_eq!(item(json!({})).category(), "General");
    }

    #[test]
    fn test_item_code_prefers_pos_id() {
        let both = item(json!({ "dish": { "posDishId": 42, "_id": { "$oid": "abc" } } }));
        assert_eq!(both.item_code(), "42");

        let oid = item(json!({ "dish": { "posDishId": null, "_id": { "$oid": "abc" } } }));
        assert_eq!(oid.item_code(), "abc");

        assert_eq!(item(json!({})).item_code(), "");
        assert_eq!(item(json!({})).item_name(), "Unknown");
        assert_eq!(item(json!({ "dish": { "name": "" } })).item_name(), "Unknown");
    }

    #[test]
    fn test_payment_defaults() {
        let p = payment(json!({ "total": "118", "tax": null, "discount": "n/a", "billItems": null }));
        assert_eq!(p.invoice_total(), dec!(118));
        assert_eq!(p.tax_amount(), Decimal::ZERO);
        assert_eq!(p.discount_amount(), Decimal::ZERO);
        assert!(p.bill_items.is_empty());
        assert_eq!(p.payment_name(), "CASH");
        assert_eq!(payment(json!({ "mode": "upi" })).payment_name(), "UPI");
    }

    #[test]
    fn test_pre_tax_total_derivation() {
        assert_eq!(
            payment(json!({ "total": 118, "tax": 18, "subTotal": 90 })).pre_tax_total(),
            dec!(90)
        );
        assert_eq!(
            payment(json!({ "total": 118, "tax": 18 })).pre_tax_total(),
            dec!(100)
        );
    }

    #[test]
    fn test_allocated_tax_is_proportional() {
        let p = payment(json!({ "total": 118, "tax": 18, "subTotal": 100 }));
        let tea = item(json!({ "dish": { "price": 60 }, "quantity": 1 }));
        let cake = item(json!({ "dish": { "price": 20 }, "quantity": 2 }));
        assert_eq!(tea.allocated_tax(&p), dec!(10.8));
        assert_eq!(cake.allocated_tax(&p), dec!(7.2));
    }

    #[test]
    fn test_allocated_tax_zero_for_non_positive_base() {
        let p = payment(json!({ "total": 10, "tax": 10 }));
        let line = item(json!({ "dish": { "price": 5 }, "quantity": 2 }));
        assert_eq!(line.allocated_tax(&p), Decimal::ZERO);

        let negative = payment(json!({ "tax": 5, "subTotal": -1 }));
        assert_eq!(line.allocated_tax(&negative), Decimal::ZERO);
    }

    #[test]
    fn test_timestamp_source_precedence() {
        let p = payment(json!({ "createdAt": "", "date": "2024-01-01" }));
        assert_eq!(p.timestamp_source(), Some(&json!("2024-01-01")));
        let p = payment(json!({ "createdAt": { "$date": 1 }, "date": "2024-01-01" }));
        assert_eq!(p.timestamp_source(), Some(&json!({ "$date": 1 })));
        assert_eq!(payment(json!({})).timestamp_source(), None);
    }
}
