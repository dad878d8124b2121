use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    #[serde(rename = "price")]
    pub amount: u64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Price {
            amount,
            currency: currency.into(),
        }
    }
}
