//! The product record and its identifier.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use utoipa::ToSchema;

const ID_LEN: usize = 12;

/// Store-assigned product identifier, rendered as 24 lowercase hex characters.
///
/// Layout (object-id style): 4-byte big-endian unix seconds, 5 bytes chosen
/// randomly once per process, 3-byte wrapping counter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId([u8; ID_LEN]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid product id '{0}': expected 24 hex characters")]
pub struct InvalidProductId(pub String);

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(rand::random)
}

impl ProductId {
    /// Mints a fresh identifier. Unique within a process for up to 2^24 ids per second.
    pub fn generate() -> Self {
        static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>()))
            .fetch_add(1, Ordering::Relaxed);

        let secs = chrono::Utc::now().timestamp() as u32;
        let mut bytes = [0u8; ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Hex form, as stored and sent over the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ProductId {
    type Err = InvalidProductId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != ID_LEN * 2 {
            return Err(InvalidProductId(s.to_string()));
        }
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(trimmed, &mut bytes).map_err(|_| InvalidProductId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for ProductId {
    type Error = InvalidProductId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.to_hex()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.to_hex())
    }
}

/// An inventory item.
///
/// `id` is absent until the store assigns one and is omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
}

/// The mutable part of a product: what clients send on create and update.
///
/// Unknown keys (including `id`) are ignored on decode. A missing or `null`
/// field decodes to its zero value; a value of the wrong type is still an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            stock,
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Unit price times quantity on hand.
    pub fn inventory_value(&self) -> f64 {
        self.price * self.stock as f64
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
        }
    }

    /// Replaces every mutable field; the id is left untouched.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.price = fields.price;
        self.stock = fields.stock;
    }
}

impl From<ProductFields> for Product {
    fn from(fields: ProductFields) -> Self {
        Product::new(fields.name, fields.price, fields.stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<ProductId> = (0..10_000).map(|_| ProductId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn id_parses_its_own_hex() {
        let id = ProductId::generate();
        let hex = id.to_string();
        assert_eq!(hex.len(), 24);
        assert_eq!(hex.parse::<ProductId>().unwrap(), id);
        assert_eq!(hex.to_uppercase().parse::<ProductId>().unwrap(), id);
    }

    #[test]
    fn id_rejects_malformed_input() {
        assert!("".parse::<ProductId>().is_err());
        assert!("abc".parse::<ProductId>().is_err());
        assert!("zzzzzzzzzzzzzzzzzzzzzzzz".parse::<ProductId>().is_err());
        assert!("65f1c2a9e4b0a1b2c3d4e5f6aa".parse::<ProductId>().is_err());
    }

    #[test]
    fn product_without_id_omits_it_on_the_wire() {
        let value = serde_json::to_value(Product::new("Lamp", 12.5, 3)).unwrap();
        assert_eq!(value, json!({"name": "Lamp", "price": 12.5, "stock": 3}));
    }

    #[test]
    fn product_id_serializes_as_hex_string() {
        let id: ProductId = "65f1c2a9e4b0a1b2c3d4e5f6".parse().unwrap();
        let value = serde_json::to_value(Product::new("Lamp", 1.0, 1).with_id(id)).unwrap();
        assert_eq!(value["id"], json!("65f1c2a9e4b0a1b2c3d4e5f6"));

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, Some(id));
    }

    #[test]
    fn fields_ignore_client_supplied_id() {
        let fields: ProductFields =
            serde_json::from_value(json!({"id": "not-an-id", "name": "Desk", "price": 99.0, "stock": 2}))
                .unwrap();
        assert_eq!(fields.name, "Desk");
    }

    #[test]
    fn missing_and_null_fields_decode_to_zero_values() {
        let fields: ProductFields = serde_json::from_value(json!({"name": "Lamp"})).unwrap();
        assert_eq!(fields, ProductFields { name: "Lamp".into(), ..Default::default() });

        let fields: ProductFields =
            serde_json::from_value(json!({"name": null, "price": null, "stock": 3})).unwrap();
        assert_eq!(fields, ProductFields { name: String::new(), price: 0.0, stock: 3 });

        let product: Product = serde_json::from_value(json!({"price": 2.5})).unwrap();
        assert_eq!(product, Product::new("", 2.5, 0));
    }

    #[test]
    fn mistyped_fields_are_still_rejected() {
        assert!(serde_json::from_value::<ProductFields>(json!({"price": "cheap"})).is_err());
        assert!(serde_json::from_value::<ProductFields>(json!({"stock": 1.5})).is_err());
        assert!(serde_json::from_value::<ProductFields>(json!({"name": 1})).is_err());
        assert!(serde_json::from_value::<ProductFields>(json!([1, 2])).is_err());
    }

    #[test]
    fn apply_keeps_id() {
        let id = ProductId::generate();
        let mut product = Product::new("Old", 1.0, 1).with_id(id);
        product.apply(ProductFields {
            name: "New".into(),
            price: 2.0,
            stock: 7,
        });
        assert_eq!(product.id, Some(id));
        assert_eq!(product.fields().name, "New");
        assert_eq!(product.inventory_value(), 14.0);
    }
}
