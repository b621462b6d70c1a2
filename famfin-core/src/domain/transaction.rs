//! Transaction domain model and form validation

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::result::{Error, Result};
use super::UserProfile;

pub const MSG_REQUIRED_FIELDS: &str = "Semua field harus diisi";
pub const MSG_INVALID_AMOUNT: &str = "Jumlah harus berupa angka lebih dari 0";
pub const MSG_INVALID_DATE: &str = "Format tanggal harus YYYY-MM-DD";
pub const MSG_INVALID_CATEGORY: &str = "Kategori tidak valid untuk jenis transaksi ini";

/// Income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Indonesian display label
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Pemasukan",
            TransactionType::Expense => "Pengeluaran",
        }
    }

    /// Categories a transaction of this type may use
    pub fn categories(&self) -> &'static [Category] {
        match self {
            TransactionType::Income => &[
                Category::Gaji,
                Category::Bonus,
                Category::Investasi,
                Category::Lainnya,
            ],
            TransactionType::Expense => &[
                Category::Makanan,
                Category::Transport,
                Category::Belanja,
                Category::Pendidikan,
                Category::Kesehatan,
                Category::Hiburan,
                Category::Lainnya,
            ],
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::validation(format!(
                "Unknown transaction type '{}' (expected income or expense)",
                other
            ))),
        }
    }
}

/// Fixed category set shared by both transaction types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Gaji,
    Bonus,
    Investasi,
    Makanan,
    Transport,
    Belanja,
    Pendidikan,
    Kesehatan,
    Hiburan,
    Lainnya,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Gaji,
        Category::Bonus,
        Category::Investasi,
        Category::Makanan,
        Category::Transport,
        Category::Belanja,
        Category::Pendidikan,
        Category::Kesehatan,
        Category::Hiburan,
        Category::Lainnya,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gaji => "Gaji",
            Category::Bonus => "Bonus",
            Category::Investasi => "Investasi",
            Category::Makanan => "Makanan",
            Category::Transport => "Transport",
            Category::Belanja => "Belanja",
            Category::Pendidikan => "Pendidikan",
            Category::Kesehatan => "Kesehatan",
            Category::Hiburan => "Hiburan",
            Category::Lainnya => "Lainnya",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }

    /// Icon name used by list rows
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Gaji => "cash",
            Category::Bonus => "gift",
            Category::Investasi => "trending-up",
            Category::Makanan => "fast-food",
            Category::Transport => "car",
            Category::Belanja => "cart",
            Category::Pendidikan => "school",
            Category::Kesehatan => "medical",
            Category::Hiburan => "game-controller",
            Category::Lainnya => "ellipsis-horizontal",
        }
    }

    /// Icon for a raw category string from the server
    pub fn icon_for(name: &str) -> &'static str {
        Self::parse(name).unwrap_or(Category::Lainnya).icon()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creator reference on a transaction; populated object or bare id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedBy {
    Profile {
        #[serde(rename = "_id", default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Id(String),
}

impl CreatedBy {
    pub fn id(&self) -> Option<&str> {
        match self {
            CreatedBy::Profile { id, .. } => id.as_deref(),
            CreatedBy::Id(id) => Some(id),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CreatedBy::Profile { name, .. } => name.as_deref(),
            CreatedBy::Id(_) => None,
        }
    }
}

/// A transaction as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        serialize_with = "serialize_amount"
    )]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// ISO date or date-time string
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
}

impl Transaction {
    /// Calendar date part of `date` (`YYYY-MM-DD`)
    pub fn date_only(&self) -> &str {
        self.date.split('T').next().unwrap_or(&self.date)
    }

    /// Display name of the creator, `Unknown` when the server sent none
    pub fn creator_name(&self) -> &str {
        self.created_by
            .as_ref()
            .and_then(CreatedBy::name)
            .unwrap_or("Unknown")
    }

    /// Only the creator may edit or delete a transaction
    pub fn is_owned_by(&self, user: &UserProfile) -> bool {
        match (
            self.created_by.as_ref().and_then(CreatedBy::id),
            user.id.as_deref(),
        ) {
            (Some(creator), Some(me)) => creator == me,
            _ => false,
        }
    }

    /// Prefill an edit form from this transaction
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            amount: self.amount.normalize().to_string(),
            description: self.description.clone(),
            category: self.category.clone(),
            date: self.date_only().to_string(),
        }
    }
}

/// Transaction form as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionType,
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: String,
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

/// Parse user-typed amount text; accepts plain and scientific notation
fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

impl TransactionDraft {
    /// Run the client-side guards and build the request payload.
    ///
    /// Guards run in a fixed order and the first failure wins.
    pub fn validate(&self, user_id: Option<&str>) -> Result<NewTransaction> {
        if self.amount.trim().is_empty()
            || self.description.trim().is_empty()
            || self.category.trim().is_empty()
            || self.date.trim().is_empty()
        {
            return Err(Error::validation(MSG_REQUIRED_FIELDS));
        }

        let amount = match parse_amount(&self.amount) {
            Some(a) if a > Decimal::ZERO => a,
            _ => return Err(Error::validation(MSG_INVALID_AMOUNT)),
        };

        if !date_pattern().is_match(&self.date) {
            return Err(Error::validation(MSG_INVALID_DATE));
        }

        if !self
            .kind
            .categories()
            .iter()
            .any(|c| c.as_str() == self.category)
        {
            return Err(Error::validation(MSG_INVALID_CATEGORY));
        }

        Ok(NewTransaction {
            kind: self.kind,
            amount,
            description: self.description.clone(),
            category: self.category.clone(),
            date: self.date.clone(),
            user: user_id.map(str::to_string),
        })
    }
}

/// Validated create/update payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// List filter; `kind == None` means all types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search: String,
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    /// Query pairs sent with the list request. `type` is omitted for "all".
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("search", self.search.clone())];
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_string()));
        }
        pairs
    }
}

/// Deserialize an amount that can be a JSON number or string
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e)))
        }
        JsonValue::String(s) => parse_amount(&s)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal: {}", s))),
        JsonValue::Null => Ok(Decimal::ZERO),
        _ => Err(D::Error::custom("expected number or string for amount")),
    }
}

/// The server expects amounts as JSON numbers
pub(crate) fn serialize_amount<S>(amount: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::Error;
    let value = amount
        .to_f64()
        .ok_or_else(|| S::Error::custom("amount out of range"))?;
    serializer.serialize_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: &str) -> TransactionDraft {
        TransactionDraft {
            kind: TransactionType::Expense,
            amount: amount.to_string(),
            description: "Makan siang".to_string(),
            category: "Makanan".to_string(),
            date: "2024-03-15".to_string(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let tx = draft("25000.50").validate(Some("u1")).unwrap();
        assert_eq!(tx.amount, Decimal::new(2500050, 2));
        assert_eq!(tx.user.as_deref(), Some("u1"));

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["amount"], serde_json::json!(25000.5));
        assert_eq!(json["user"], "u1");
    }

    #[test]
    fn test_zero_and_non_numeric_amounts_rejected() {
        for amount in ["0", "0.00", "-10", "abc", "12abc"] {
            let err = draft(amount).validate(None).unwrap_err();
            assert_eq!(err.user_message(""), MSG_INVALID_AMOUNT, "amount {amount}");
        }
    }

    #[test]
    fn test_missing_fields_checked_first() {
        let mut d = draft("abc");
        d.description = "  ".to_string();
        let err = d.validate(None).unwrap_err();
        assert_eq!(err.user_message(""), MSG_REQUIRED_FIELDS);
    }

    #[test]
    fn test_date_format() {
        let mut d = draft("1000");
        d.date = "2024-3-15".to_string();
        assert_eq!(d.validate(None).unwrap_err().user_message(""), MSG_INVALID_DATE);

        d.date = "15/03/2024".to_string();
        assert_eq!(d.validate(None).unwrap_err().user_message(""), MSG_INVALID_DATE);
    }

    #[test]
    fn test_category_must_match_type() {
        let mut d = draft("1000");
        d.category = "Gaji".to_string();
        assert_eq!(d.validate(None).unwrap_err().user_message(""), MSG_INVALID_CATEGORY);

        d.kind = TransactionType::Income;
        assert!(d.validate(None).is_ok());
    }

    #[test]
    fn test_server_record_parsing() {
        let raw = r#"{
            "_id": "t1",
            "type": "income",
            "amount": 5000000,
            "description": "Gaji Maret",
            "category": "Gaji",
            "date": "2024-03-01T00:00:00.000Z",
            "createdBy": {"_id": "u1", "name": "Budi"}
        }"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.amount, Decimal::new(5000000, 0));
        assert_eq!(tx.date_only(), "2024-03-01");
        assert_eq!(tx.creator_name(), "Budi");
        assert!(tx.is_owned_by(&UserProfile::new("Budi", "").with_id("u1")));
        assert!(!tx.is_owned_by(&UserProfile::new("Ana", "").with_id("u2")));

        let draft = tx.to_draft();
        assert_eq!(draft.amount, "5000000");
        assert_eq!(draft.date, "2024-03-01");
    }

    #[test]
    fn test_creator_as_bare_id() {
        let raw = r#"{"_id":"t2","type":"expense","amount":"12.5","createdBy":"u9"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.amount, Decimal::new(125, 1));
        assert_eq!(tx.creator_name(), "Unknown");
        assert_eq!(tx.created_by.unwrap().id(), Some("u9"));
    }

    #[test]
    fn test_filter_query() {
        let all = TransactionFilter {
            search: "makan".to_string(),
            kind: None,
        };
        assert_eq!(all.query_pairs(), vec![("search", "makan".to_string())]);

        let income = TransactionFilter {
            search: String::new(),
            kind: Some(TransactionType::Income),
        };
        assert_eq!(income.query_pairs()[1], ("type", "income".to_string()));
    }

    #[test]
    fn test_category_icons() {
        assert_eq!(Category::icon_for("Transport"), "car");
        assert_eq!(Category::icon_for("Sesuatu"), "ellipsis-horizontal");
        assert_eq!(TransactionType::Income.categories().len(), 4);
        assert_eq!(TransactionType::Expense.categories().len(), 7);
    }
}
