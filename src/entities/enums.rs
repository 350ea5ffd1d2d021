use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Trading names the business books orders under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::EnumString,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Firm {
    #[sea_orm(string_value = "New Jalaram Transport Service")]
    #[serde(rename = "New Jalaram Transport Service")]
    #[strum(serialize = "New Jalaram Transport Service")]
    NewJalaramTransportService,
    #[sea_orm(string_value = "Jayshree Transport Company")]
    #[serde(rename = "Jayshree Transport Company")]
    #[strum(serialize = "Jayshree Transport Company")]
    JayshreeTransportCompany,
    #[sea_orm(string_value = "Jalaram Cargo")]
    #[serde(rename = "Jalaram Cargo")]
    #[strum(serialize = "Jalaram Cargo")]
    JalaramCargo,
}

impl Default for Firm {
    fn default() -> Self {
        Firm::NewJalaramTransportService
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::EnumString,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum OrderType {
    /// Consignor and consignee are booked directly.
    #[default]
    #[sea_orm(string_value = "PARTY")]
    Party,
    /// A booking agent stands in for both parties.
    #[sea_orm(string_value = "AGENT")]
    Agent,
}

/// The five kinds of record a concerned person can belong to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::EnumString,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PartyKind {
    #[sea_orm(string_value = "CONSIGNOR")]
    Consignor,
    #[sea_orm(string_value = "CONSIGNEE")]
    Consignee,
    #[sea_orm(string_value = "AGENT")]
    Agent,
    #[sea_orm(string_value = "DRIVER")]
    Driver,
    #[sea_orm(string_value = "OWNER")]
    Owner,
}

/// Order status vocabulary. Known values are matched case-insensitively;
/// anything else is carried verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum OrderStatus {
    New,
    Confirmed,
    Dispatched,
    Closed,
    InProgress,
    Completed,
    Cancelled,
    #[strum(default)]
    Custom(String),
}

impl OrderStatus {
    /// Statuses shown in the "active" list filter.
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::New, OrderStatus::Confirmed];

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match OrderStatus::from_str(trimmed) {
            Ok(OrderStatus::Custom(_)) | Err(_) => OrderStatus::Custom(trimmed.to_string()),
            Ok(status) => status,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Dispatched => "DISPATCHED",
            OrderStatus::Closed => "CLOSED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Custom(value) => value,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, OrderStatus::Custom(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Closed | OrderStatus::Completed | OrderStatus::Cancelled
        )
    }

    /// Transition table applied under the strict status policy.
    /// Re-applying the current status is always allowed, terminal statuses
    /// have no way out, and an order sitting in an unrecognised status may
    /// move to any known one.
    pub fn can_transition_to(&self, next: &OrderStatus) -> bool {
        use OrderStatus::*;

        if self == next {
            return true;
        }
        if self.is_terminal() || next.is_custom() {
            return false;
        }
        if self.is_custom() {
            return true;
        }

        matches!(
            (self, next),
            (New, Confirmed)
                | (New, Dispatched)
                | (New, Cancelled)
                | (Confirmed, New)
                | (Confirmed, Dispatched)
                | (Confirmed, Cancelled)
                | (InProgress, Dispatched)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (Dispatched, InProgress)
                | (Dispatched, Closed)
                | (Dispatched, Completed)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::New
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BuiltyStatus {
    InTransit,
    Delivered,
    Pending,
    #[strum(default)]
    Custom(String),
}

impl BuiltyStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match BuiltyStatus::from_str(trimmed) {
            Ok(BuiltyStatus::Custom(_)) | Err(_) => BuiltyStatus::Custom(trimmed.to_string()),
            Ok(status) => status,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuiltyStatus::InTransit => "IN_TRANSIT",
            BuiltyStatus::Delivered => "DELIVERED",
            BuiltyStatus::Pending => "PENDING",
            BuiltyStatus::Custom(value) => value,
        }
    }
}

impl Default for BuiltyStatus {
    fn default() -> Self {
        BuiltyStatus::InTransit
    }
}

impl fmt::Display for BuiltyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use sea_orm::Iterable;

    #[rstest]
    #[case("NEW", OrderStatus::New)]
    #[case("confirmed", OrderStatus::Confirmed)]
    #[case(" Dispatched ", OrderStatus::Dispatched)]
    #[case("IN_PROGRESS", OrderStatus::InProgress)]
    #[case("BANANA", OrderStatus::Custom("BANANA".into()))]
    fn order_status_parses(#[case] raw: &str, #[case] expected: OrderStatus) {
        assert_eq!(OrderStatus::parse(raw), expected);
    }

    #[test]
    fn custom_status_keeps_caller_spelling() {
        assert_eq!(OrderStatus::parse("Awaiting Pickup").as_str(), "Awaiting Pickup");
    }

    #[rstest]
    #[case(OrderStatus::New, OrderStatus::Confirmed, true)]
    #[case(OrderStatus::Confirmed, OrderStatus::Dispatched, true)]
    #[case(OrderStatus::Dispatched, OrderStatus::Closed, true)]
    #[case(OrderStatus::Closed, OrderStatus::New, false)]
    #[case(OrderStatus::New, OrderStatus::Closed, false)]
    #[case(OrderStatus::New, OrderStatus::Custom("BANANA".into()), false)]
    #[case(OrderStatus::Custom("HOLD".into()), OrderStatus::Confirmed, true)]
    #[case(OrderStatus::Cancelled, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Completed, OrderStatus::Dispatched, false)]
    #[case(OrderStatus::Cancelled, OrderStatus::Custom("HOLD".into()), false)]
    fn transition_table(
        #[case] from: OrderStatus,
        #[case] to: OrderStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }

    #[test]
    fn firm_names_round_trip_through_strings() {
        for firm in Firm::iter() {
            assert_eq!(Firm::from_str(&firm.to_string()).unwrap(), firm);
        }
        assert!(Firm::from_str("Acme Logistics").is_err());
    }

    #[test]
    fn party_kind_parses_case_insensitively() {
        assert_eq!(PartyKind::from_str("consignee").unwrap(), PartyKind::Consignee);
        assert_eq!(PartyKind::Agent.to_string(), "AGENT");
    }

    #[test]
    fn builty_status_defaults_to_in_transit() {
        assert_eq!(BuiltyStatus::default().as_str(), "IN_TRANSIT");
        assert_eq!(BuiltyStatus::parse("pending"), BuiltyStatus::Pending);
    }

    proptest! {
        #[test]
        fn parsed_status_renders_back_to_trimmed_input_or_canonical(raw in "[A-Za-z_ ]{1,16}") {
            let status = OrderStatus::parse(&raw);
            let rendered = status.as_str().to_string();
            if status.is_custom() {
                prop_assert_eq!(rendered, raw.trim().to_string());
            } else {
                prop_assert_eq!(rendered.to_lowercase(), raw.trim().to_lowercase());
            }
        }
    }
}
