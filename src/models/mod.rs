use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::parse_int;

pub mod views;

pub const DEFAULT_PCT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub expense_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: i64,
    // corrupted dates read as text and are left to the formatter
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vat: String,
    #[serde(default = "default_pct", deserialize_with = "lenient_pct")]
    pub pct: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_admin: Option<String>,
}

/// Display copy of a [`Bill`] as listed on the employee bills page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRow {
    pub id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: i64,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub status_label: String,
    pub comment_admin: Option<String>,
}

impl BillRow {
    pub fn from_bill(bill: Bill, date: String, status_label: String) -> Self {
        BillRow {
            id: bill.id,
            email: bill.email,
            expense_type: bill.expense_type,
            name: bill.name,
            amount: bill.amount,
            date,
            vat: bill.vat,
            pct: bill.pct,
            commentary: bill.commentary,
            file_url: bill.file_url,
            file_name: bill.file_name,
            status: bill.status,
            status_label,
            comment_admin: bill.comment_admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Connected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub email: String,
    pub password: String,
    pub status: SessionStatus,
}

impl SessionUser {
    pub fn connected(user_type: UserType, email: &str, password: &str) -> Self {
        SessionUser {
            user_type,
            email: email.to_string(),
            password: password.to_string(),
            status: SessionStatus::Connected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub jwt: String,
}

/// Response of a receipt upload: where the file lives and the key of the
/// draft bill created for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub file_url: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub email: String,
}

fn default_pct() -> i64 {
    DEFAULT_PCT
}

fn integer_value(value: Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int(&s),
        _ => None,
    }
}

fn lenient_pct<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let pct = integer_value(Value::deserialize(deserializer)?);
    Ok(pct.filter(|p| *p != 0).unwrap_or(DEFAULT_PCT))
}

// Records written before amounts were validated may carry `null`.
fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(integer_value(Value::deserialize(deserializer)?).unwrap_or(0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_bill(pct: Value) -> Value {
        json!({
            "id": "47qAXb6fIm2zOKkLzMro",
            "email": "a@a",
            "type": "Hôtel et logement",
            "name": "encore",
            "amount": 400,
            "date": "2004-04-04",
            "vat": 80,
            "pct": pct,
            "commentary": "séminaire billed",
            "fileUrl": "https://test.storage.tld/receipt.jpg",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "status": "pending"
        })
    }

    #[test]
    fn pct_falls_back_to_twenty() {
        for pct in [json!(null), json!("abc"), json!(""), json!(0)] {
            let bill: Bill = serde_json::from_value(raw_bill(pct)).unwrap();
            assert_eq!(bill.pct, 20);
        }
        let bill: Bill = serde_json::from_value(raw_bill(json!("15%"))).unwrap();
        assert_eq!(bill.pct, 15);
    }

    #[test]
    fn missing_pct_defaults() {
        let mut raw = raw_bill(json!(10));
        raw.as_object_mut().unwrap().remove("pct");
        let bill: Bill = serde_json::from_value(raw).unwrap();
        assert_eq!(bill.pct, 20);
    }

    #[test]
    fn numeric_vat_is_kept_as_text() {
        let bill: Bill = serde_json::from_value(raw_bill(json!(20))).unwrap();
        assert_eq!(bill.vat, "80");
        assert_eq!(bill.expense_type, "Hôtel et logement");
        assert_eq!(bill.status, BillStatus::Pending);
    }

    #[test]
    fn null_amount_reads_as_zero() {
        let mut raw = raw_bill(json!(20));
        raw["amount"] = json!(null);
        let bill: Bill = serde_json::from_value(raw).unwrap();
        assert_eq!(bill.amount, 0);
    }

    #[test]
    fn batch_with_null_date_keeps_every_record() {
        let mut corrupted = raw_bill(json!(20));
        corrupted["id"] = json!("corrupted");
        corrupted["date"] = json!(null);
        corrupted.as_object_mut().unwrap().remove("name");

        let bills: Vec<Bill> = serde_json::from_value(json!([raw_bill(json!(20)), corrupted])).unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].date, "2004-04-04");
        assert_eq!(bills[1].date, "");
        assert_eq!(bills[1].name, "");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut raw = raw_bill(json!(20));
        raw["status"] = json!("archived");
        assert!(serde_json::from_value::<Bill>(raw).is_err());
    }

    #[test]
    fn session_user_wire_format() {
        let user = SessionUser::connected(UserType::Admin, "admin@test.tld", "admin");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Admin",
                "email": "admin@test.tld",
                "password": "admin",
                "status": "connected"
            })
        );
    }
}
