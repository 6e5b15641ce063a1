//! Inventory item types and request forms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    database_id::DatabaseId,
    validation::{FieldError, Validate, decimal, deserialize_some, required_decimal, required_text, text},
};

/// Database identifier for an inventory item.
pub type InventoryItemId = DatabaseId;

/// Something the farm has in stock, e.g. 40 bags of seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// The ID of the item.
    pub id: InventoryItemId,
    /// What the item is.
    pub name: String,
    /// How much of the item there is, in `unit`s.
    pub quantity: Decimal,
    /// The unit `quantity` is measured in, e.g. "bags" or "kg".
    pub unit: String,
    /// The estimated total value of the item, if known.
    pub value: Option<Decimal>,
    /// When the item was created or last changed. Set by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

/// The data needed to create an [InventoryItem].
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub value: Option<Decimal>,
}

impl NewInventoryItem {
    /// Attach the store-assigned fields.
    pub fn into_item(self, id: InventoryItemId, last_updated: OffsetDateTime) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            value: self.value,
            last_updated,
        }
    }
}

/// A partial update for an [InventoryItem].
///
/// `value: Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub value: Option<Option<Decimal>>,
}

impl InventoryPatch {
    /// Merge the supplied fields into `item` and set its last updated time.
    pub fn apply_to(self, item: &mut InventoryItem, now: OffsetDateTime) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(value) = self.value {
            item.value = value;
        }

        item.last_updated = now;
    }
}

/// Parse an optional value where `null` and `""` both mean "unknown".
fn optional_value(value: Option<Value>, errors: &mut Vec<FieldError>) -> Option<Decimal> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(value) => decimal("value", &value, errors),
    }
}

/// The JSON body for creating an inventory item.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InventoryForm {
    pub name: Option<String>,
    pub quantity: Option<Value>,
    pub unit: Option<String>,
    pub value: Option<Value>,
}

impl Validate for InventoryForm {
    type Output = NewInventoryItem;

    const INVALID_MESSAGE: &'static str = "Invalid inventory data";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required_text("name", self.name, &mut errors);
        let quantity = required_decimal("quantity", self.quantity, &mut errors);
        let unit = required_text("unit", self.unit, &mut errors);
        let value = optional_value(self.value, &mut errors);

        match (name, quantity, unit) {
            (Some(name), Some(quantity), Some(unit)) if errors.is_empty() => Ok(NewInventoryItem {
                name,
                quantity,
                unit,
                value,
            }),
            _ => Err(errors),
        }
    }
}

/// The JSON body for partially updating an inventory item.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InventoryPatchForm {
    pub name: Option<String>,
    pub quantity: Option<Value>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub value: Option<Option<Value>>,
}

impl Validate for InventoryPatchForm {
    type Output = InventoryPatch;

    const INVALID_MESSAGE: &'static str = "Invalid inventory data";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let patch = InventoryPatch {
            name: self.name.and_then(|value| text("name", value, &mut errors)),
            quantity: self
                .quantity
                .and_then(|value| decimal("quantity", &value, &mut errors)),
            unit: self.unit.and_then(|value| text("unit", value, &mut errors)),
            value: self
                .value
                .map(|value| optional_value(value, &mut errors)),
        };

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod inventory_form_tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{
        inventory::{InventoryForm, InventoryPatchForm, NewInventoryItem},
        validation::{FieldError, Validate},
    };

    #[test]
    fn valid_form_produces_new_item() {
        let form: InventoryForm = serde_json::from_value(json!({
            "name": "Seed bags",
            "quantity": 40,
            "unit": "bags",
            "value": "1250.5"
        }))
        .unwrap();

        let got = form.validate();

        assert_eq!(
            got,
            Ok(NewInventoryItem {
                name: "Seed bags".to_owned(),
                quantity: Decimal::new(4000, 2),
                unit: "bags".to_owned(),
                value: Some(Decimal::new(125050, 2)),
            })
        );
    }

    #[test]
    fn blank_value_means_unknown() {
        let form: InventoryForm = serde_json::from_value(json!({
            "name": "Hay",
            "quantity": "12",
            "unit": "bales",
            "value": ""
        }))
        .unwrap();

        let got = form.validate().expect("want a valid item");

        assert_eq!(got.value, None);
    }

    #[test]
    fn missing_unit_is_required() {
        let form: InventoryForm =
            serde_json::from_value(json!({"name": "Hay", "quantity": "12"})).unwrap();

        let got = form.validate();

        assert_eq!(got, Err(vec![FieldError::new("unit", "Required")]));
    }

    #[test]
    fn patch_with_null_value_clears_it() {
        let form: InventoryPatchForm =
            serde_json::from_value(json!({"value": null, "quantity": "3"})).unwrap();

        let patch = form.validate().expect("want a valid patch");

        assert_eq!(patch.value, Some(None));
        assert_eq!(patch.quantity, Some(Decimal::new(300, 2)));
        assert_eq!(patch.name, None);
    }
}
