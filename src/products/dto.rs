use serde::Deserialize;

/// Body accepted by create and update.
///
/// Every field except `name` falls back to its default when absent, and a
/// replace writes all of them. `id` and timestamps in the body are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i32,
}

impl ProductPayload {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must be a non-negative number".into());
        }
        Ok(())
    }
}
