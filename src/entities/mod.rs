pub mod booking_agent;
pub mod builty;
pub mod concerned_person;
pub mod consignee;
pub mod consignor;
pub mod driver;
pub mod enums;
pub mod goods;
pub mod order;
pub mod owner;
pub mod phone_book;
pub mod pin_code;
pub mod station;
pub mod transaction_log;
pub mod vehicle;

pub use enums::{BuiltyStatus, Firm, OrderStatus, OrderType, PartyKind};
