//! Deal status type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`DealStatus`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid status: must be open, won, or lost")]
pub struct DealStatusError;

/// Lifecycle status of a deal.
///
/// Every deal starts `Open` and is eventually marked `Won` or `Lost`.
/// Serialized as the lowercase strings `"open"` / `"won"` / `"lost"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Still being worked.
    #[default]
    Open,
    /// Closed successfully.
    Won,
    /// Closed without a sale.
    Lost,
}

impl DealStatus {
    /// Returns the status as its wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DealStatus {
    type Err = DealStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(DealStatusError),
        }
    }
}

// SQLx support (with postgres feature) - stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for DealStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for DealStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for DealStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(DealStatus::Open.as_str(), "open");
        assert_eq!(DealStatus::Won.as_str(), "won");
        assert_eq!(DealStatus::Lost.as_str(), "lost");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("open".parse::<DealStatus>().unwrap(), DealStatus::Open);
        assert_eq!("won".parse::<DealStatus>().unwrap(), DealStatus::Won);
        assert_eq!("lost".parse::<DealStatus>().unwrap(), DealStatus::Lost);
        assert!("pending".parse::<DealStatus>().is_err());
    }

    #[test]
    fn test_default_is_open() {
        assert_eq!(DealStatus::default(), DealStatus::Open);
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&DealStatus::Won).unwrap(), "\"won\"");
        let status: DealStatus = serde_json::from_str("\"lost\"").unwrap();
        assert_eq!(status, DealStatus::Lost);
        assert!(serde_json::from_str::<DealStatus>("\"closed\"").is_err());
    }
}
