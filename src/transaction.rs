//! Defines the transaction model read from the store and the categories a
//! user may assign to a transaction.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::Error;

/// The label shown for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

// ============================================================================
// MODELS
// ============================================================================

/// A bank transaction, i.e. an event where money was either spent or earned.
///
/// Transactions are created by an external ingestion process. This crate only
/// reads them and writes back the `category` field.
///
/// The serde field names match the columns of the `transactions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The primary key of the row in the store.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// The ID given to the transaction by the bank data provider.
    #[serde(
        rename = "truelayer_id",
        default,
        deserialize_with = "deserialize_optional_id"
    )]
    pub external_id: Option<String>,
    /// When the transaction happened as an ISO 8601 date, e.g. "2025-01-31".
    pub date: String,
    /// The amount of money spent or earned.
    ///
    /// The sign is not reliable across data sources, callers should use
    /// [Transaction::absolute_amount] and [Transaction::is_income].
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// The bank's description of the transaction.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    /// The merchant name reported by the bank, if any.
    #[serde(default)]
    pub merchant_name: Option<String>,
    /// The free text category label, e.g. "Groceries".
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the transaction is income rather than an expense.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_income: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: &str, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            external_id: None,
            date: date.to_owned(),
            amount,
            description: description.to_owned(),
            merchant_name: None,
            category: None,
            is_income: false,
        }
    }

    /// The ID used to update the transaction: the external ID if there is
    /// one, otherwise the store's primary key.
    pub fn key(&self) -> &str {
        match self.external_id.as_deref() {
            Some(external_id) if !external_id.trim().is_empty() => external_id,
            _ => &self.id,
        }
    }

    /// Whether `transaction_id` refers to this transaction by either its
    /// external ID or its primary key.
    pub fn matches_id(&self, transaction_id: &str) -> bool {
        self.id == transaction_id || self.external_id.as_deref() == Some(transaction_id)
    }

    /// The `YYYY-MM` prefix of the transaction date.
    pub fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }

    /// The amount without its sign.
    pub fn absolute_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// The category label, or [UNCATEGORIZED_LABEL] if the category is
    /// missing or blank.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.trim().is_empty() => category,
            _ => UNCATEGORIZED_LABEL,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The store assigns the primary key, so [SqliteStore](crate::SqliteStore)
/// takes the builder directly. Use [TransactionBuilder::finalize] when the ID
/// is already known.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The ID given to the transaction by the bank data provider.
    pub external_id: Option<String>,
    /// When the transaction happened, e.g. "2025-01-31".
    pub date: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The bank's description of the transaction.
    pub description: String,
    /// The merchant name reported by the bank.
    pub merchant_name: Option<String>,
    /// The category label.
    pub category: Option<String>,
    /// Whether the transaction is income.
    pub is_income: bool,
}

impl TransactionBuilder {
    /// Set the external ID for the transaction.
    pub fn external_id(mut self, external_id: &str) -> Self {
        self.external_id = Some(external_id.to_owned());
        self
    }

    /// Set the merchant name for the transaction.
    pub fn merchant_name(mut self, merchant_name: &str) -> Self {
        self.merchant_name = Some(merchant_name.to_owned());
        self
    }

    /// Set the category label for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Mark the transaction as income.
    pub fn income(mut self, is_income: bool) -> Self {
        self.is_income = is_income;
        self
    }

    /// Create the transaction with the primary key `id`.
    pub fn finalize(self, id: &str) -> Transaction {
        Transaction {
            id: id.to_owned(),
            external_id: self.external_id,
            date: self.date,
            amount: self.amount,
            description: self.description,
            merchant_name: self.merchant_name,
            category: self.category,
            is_income: self.is_income,
        }
    }
}

/// The categories a user can assign to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Supermarkets and food shopping.
    Groceries,
    /// Public transport, fuel and taxis.
    Transport,
    /// Rent, utilities and subscriptions.
    Bills,
    /// Going out, streaming and hobbies.
    Entertainment,
    /// Everything else bought in shops or online.
    Shopping,
    /// Restaurants, cafes and takeaways.
    Dining,
    /// Salary and other money coming in.
    Income,
    /// Flagged for the user to look at later.
    Unclear,
    /// Not assigned a category yet.
    Uncategorized,
}

impl Category {
    /// Every category in the order they are offered to the user.
    pub const ALL: [Category; 9] = [
        Category::Groceries,
        Category::Transport,
        Category::Bills,
        Category::Entertainment,
        Category::Shopping,
        Category::Dining,
        Category::Income,
        Category::Unclear,
        Category::Uncategorized,
    ];

    /// The label stored in the `category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Dining => "Dining",
            Category::Income => "Income",
            Category::Unclear => "Unclear",
            Category::Uncategorized => UNCATEGORIZED_LABEL,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
            .ok_or_else(|| Error::InvalidCategory(label.to_owned()))
    }
}

// ============================================================================
// DESERIALIZATION HELPERS
// ============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number for the transaction ID, got {other}"
        ))),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(id) if id.trim().is_empty() => Ok(None),
        Value::String(id) => Ok(Some(id)),
        Value::Number(id) => Ok(Some(id.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string or number for the external ID, got {other}"
        ))),
    }
}

/// Malformed amounts become zero rather than failing the whole row.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_amount(&text),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    Ok(if amount.is_finite() { amount } else { 0.0 })
}

/// Parse a monetary amount from text, treating anything that is not a number as zero.
pub(crate) fn parse_amount(text: &str) -> f64 {
    match text.trim() {
        "" => 0.0,
        trimmed => trimmed
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .unwrap_or(0.0),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
