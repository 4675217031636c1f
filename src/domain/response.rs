use crate::error::{CmsClientError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("mobile pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("email pattern compiles")
});

fn mask_contact(value: &str) -> String {
    let visible: String = value.chars().take(2).collect();
    format!("{visible}{}", "*".repeat(value.chars().count().saturating_sub(2)))
}

/// Registered mobile number returned by the switch.
///
/// Either empty (nothing registered, lookup failed, or the field was null or
/// absent on the wire) or a 10-digit Indian mobile number starting with 6-9.
#[derive(Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn new(value: Option<String>) -> Result<Self> {
        let value = value.unwrap_or_default();
        if value.is_empty() || MOBILE_PATTERN.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(CmsClientError::contract(
                "mobileNumber must be empty or a valid 10-digit Indian mobile number",
            ))
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for MobileNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MobileNumber")
            .field(&mask_contact(&self.0))
            .finish()
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered email address returned by the switch.
///
/// Same null/absent-to-empty rule as [`MobileNumber`]. A present value is at
/// most 50 characters and must look like `local@domain`.
#[derive(Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct EmailId(String);

impl EmailId {
    pub const MAX_LEN: usize = 50;

    pub fn new(value: Option<String>) -> Result<Self> {
        let value = value.unwrap_or_default();
        if value.is_empty() {
            return Ok(Self(value));
        }
        if value.len() > Self::MAX_LEN {
            return Err(CmsClientError::contract(
                "emailId must not exceed 50 characters",
            ));
        }
        if !is_well_formed_email(&value) {
            return Err(CmsClientError::contract(
                "emailId must be empty or a valid email address",
            ));
        }
        Ok(Self(value))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }
}

fn is_well_formed_email(value: &str) -> bool {
    if !EMAIL_PATTERN.is_match(value) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let dotted_ok =
        |part: &str| !part.starts_with('.') && !part.ends_with('.') && !part.contains("..");
    dotted_ok(local) && dotted_ok(domain)
}

impl<'de> Deserialize<'de> for EmailId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EmailId").field(&mask_contact(&self.0)).finish()
    }
}

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business outcome reported by the switch. There is no fallback variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiRespFlag {
    Success,
    Failed,
}

impl ApiRespFlag {
    const ALL: [Self; 2] = [Self::Success, Self::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for ApiRespFlag {
    type Err = CmsClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CmsClientError::contract(format!("unsupported apiRespFlag: {s}")))
    }
}

impl<'de> Deserialize<'de> for ApiRespFlag {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ApiRespFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed switch response.
///
/// The switch answers `200 OK` for both outcomes; `api_resp_flag` tells them
/// apart. A `FAILED` response never carries contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsResponse {
    pub trace_id: String,
    pub api_resp_flag: ApiRespFlag,
    #[serde(default)]
    pub mobile_number: MobileNumber,
    #[serde(default)]
    pub email_id: EmailId,
}

impl CmsResponse {
    /// Parses and validates a raw response body.
    ///
    /// Any shape problem is a `ContractViolation`; it is never turned into a
    /// `FAILED` outcome. Violation messages name the field and position only,
    /// never the offending value.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            CmsClientError::contract(format!(
                "response body is not valid JSON ({:?} error at line {} column {})",
                e.classify(),
                e.line(),
                e.column()
            ))
        })?;
        let Value::Object(fields) = value else {
            return Err(CmsClientError::contract("response body must be a JSON object"));
        };

        let response = Self {
            trace_id: required_string(&fields, "traceId")?,
            api_resp_flag: required_string(&fields, "apiRespFlag")?.parse()?,
            mobile_number: MobileNumber::new(optional_string(&fields, "mobileNumber")?)?,
            email_id: EmailId::new(optional_string(&fields, "emailId")?)?,
        };
        response.check_outcome()?;
        Ok(response)
    }

    fn check_outcome(&self) -> Result<()> {
        if self.api_resp_flag == ApiRespFlag::Failed
            && (self.mobile_number.is_present() || self.email_id.is_present())
        {
            return Err(CmsClientError::contract(
                "FAILED response must not carry mobileNumber or emailId",
            ));
        }
        Ok(())
    }

    pub fn is_success(&self) -> bool {
        self.api_resp_flag == ApiRespFlag::Success
    }
}

fn required_string(fields: &Map<String, Value>, name: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(CmsClientError::contract(format!("{name} must be a string"))),
        None => Err(CmsClientError::contract(format!("missing field {name}"))),
    }
}

/// Absent and `null` both map to `None`.
fn optional_string(fields: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CmsClientError::contract(format!(
            "{name} must be a string or null"
        ))),
    }
}
