/// A generated value for one column of one row.
///
/// `Null` and `Default` are the two gate markers; `Expr` carries a raw SQL
/// expression (`NOW()`, `NOW() + interval '3 day'`) that must not be quoted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Default,
    Bool(bool),
    Int(i64),
    Text(String),
    Expr(String),
    Json(serde_json::Value),
}

impl Value {
    /// Convert to a SQL literal suitable for a VALUES tuple.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Default => "DEFAULT".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Text(s) => quote(s),
            Value::Expr(e) => e.clone(),
            Value::Json(j) => quote(&j.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for either gate marker.
    pub fn is_marker(&self) -> bool {
        matches!(self, Value::Null | Value::Default)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Default => write!(f, "DEFAULT"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Expr(e) => write!(f, "{}", e),
            Value::Json(j) => write!(f, "{}", j),
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
