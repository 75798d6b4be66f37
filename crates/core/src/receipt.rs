use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item category tag as emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Category {
    Other,
    Food,
    Drink,
    Ingredients,
    AlcoholTobacco,
}

impl Category {
    pub fn code(self) -> u8 {
        match self {
            Category::Other => 0,
            Category::Food => 1,
            Category::Drink => 2,
            Category::Ingredients => 3,
            Category::AlcoholTobacco => 9,
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = String;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Category::Other),
            1 => Ok(Category::Food),
            2 => Ok(Category::Drink),
            3 => Ok(Category::Ingredients),
            9 => Ok(Category::AlcoholTobacco),
            other => Err(format!("Unknown category code: {other}")),
        }
    }
}

impl From<Category> for u8 {
    fn from(c: Category) -> Self {
        c.code()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Other => write!(f, "other"),
            Category::Food => write!(f, "food"),
            Category::Drink => write!(f, "drink"),
            Category::Ingredients => write!(f, "ingredients"),
            Category::AlcoholTobacco => write!(f, "alcohol/tobacco"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_name: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Price per unit in yen.
    #[serde(default)]
    pub unit_price: Option<i64>,
    #[serde(rename = "type", default)]
    pub category: Option<Category>,
}

/// Typed view of the classifier output.
///
/// The pipeline itself hands back the untyped JSON object; this view is for
/// consumers that want the documented shape and accept that model output may
/// not conform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub datetime: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Tax amount in yen.
    #[serde(default)]
    pub tax: Option<i64>,
    /// Total including tax, in yen.
    #[serde(default)]
    pub tax_included_price: Option<i64>,
}

impl ReceiptRecord {
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object.clone()))
    }
}
