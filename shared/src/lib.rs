use serde::{Deserialize, Serialize, Serializer};

/// A single catalogue item, keyed by a caller-supplied `id`.
///
/// This is the JSON wire contract: `{"id": string, "name": string, "price": number}`.
/// Missing fields decode to their zero value and unknown fields are ignored.
/// Whole prices are written without a fractional part (`100`, not `100.0`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
}

/// Write whole-valued prices as JSON integers, anything else as a float
fn serialize_price<S>(price: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let whole = price.is_finite() && price.fract() == 0.0;
    if whole && *price >= i64::MIN as f64 && *price < i64::MAX as f64 {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}
