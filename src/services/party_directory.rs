//! Resolution of the polymorphic owner of a concerned person.
//!
//! Contacts point at their owner through `(entity_type, entity_id)` with no
//! foreign key, so existence and display names go through [`PartyDirectory`].

use crate::{
    db::DbPool,
    entities::{booking_agent, consignee, consignor, driver, owner, PartyKind},
    errors::ServiceError,
};
use async_trait::async_trait;
use futures::future::try_join_all;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

/// Names one owner of contacts: a consignor, consignee, agent, driver or owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct PartyRef {
    pub kind: PartyKind,
    pub id: i32,
}

impl PartyRef {
    pub fn new(kind: PartyKind, id: i32) -> Self {
        Self { kind, id }
    }

    /// Human label for the kind, used in not-found messages.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            PartyKind::Consignor => "Consignor",
            PartyKind::Consignee => "Consignee",
            PartyKind::Agent => "Booking agent",
            PartyKind::Driver => "Driver",
            PartyKind::Owner => "Owner",
        }
    }
}

impl fmt::Display for PartyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_label(), self.id)
    }
}

#[async_trait]
pub trait PartyDirectory: Send + Sync {
    /// `None` when the referenced row does not exist.
    async fn display_name(&self, party: PartyRef) -> Result<Option<String>, ServiceError>;

    async fn exists(&self, party: PartyRef) -> Result<bool, ServiceError> {
        Ok(self.display_name(party).await?.is_some())
    }
}

/// Looks a party's name up on any connection, including an open transaction.
pub async fn lookup_name<C>(conn: &C, party: PartyRef) -> Result<Option<String>, ServiceError>
where
    C: ConnectionTrait,
{
    let name = match party.kind {
        PartyKind::Consignor => consignor::Entity::find_by_id(party.id)
            .one(conn)
            .await?
            .map(|m| m.name),
        PartyKind::Consignee => consignee::Entity::find_by_id(party.id)
            .one(conn)
            .await?
            .map(|m| m.name),
        PartyKind::Agent => booking_agent::Entity::find_by_id(party.id)
            .one(conn)
            .await?
            .map(|m| m.name),
        PartyKind::Driver => driver::Entity::find_by_id(party.id)
            .one(conn)
            .await?
            .map(|m| m.name),
        PartyKind::Owner => owner::Entity::find_by_id(party.id)
            .one(conn)
            .await?
            .map(|m| m.name),
    };
    Ok(name)
}

/// Directory backed by the reference tables.
#[derive(Clone)]
pub struct DbPartyDirectory {
    db_pool: Arc<DbPool>,
}

impl DbPartyDirectory {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PartyDirectory for DbPartyDirectory {
    async fn display_name(&self, party: PartyRef) -> Result<Option<String>, ServiceError> {
        lookup_name(&*self.db_pool, party).await
    }
}

/// Resolves every distinct party concurrently. Parties whose row is gone are
/// left out of the map.
pub async fn resolve_names<I>(
    directory: &dyn PartyDirectory,
    parties: I,
) -> Result<HashMap<PartyRef, String>, ServiceError>
where
    I: IntoIterator<Item = PartyRef>,
{
    let distinct: HashSet<PartyRef> = parties.into_iter().collect();
    let lookups = distinct.into_iter().map(|party| async move {
        directory
            .display_name(party)
            .await
            .map(|name| name.map(|n| (party, n)))
    });

    Ok(try_join_all(lookups).await?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PartyDirectory for Fixed {
        async fn display_name(&self, party: PartyRef) -> Result<Option<String>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match (party.kind, party.id) {
                (PartyKind::Consignor, 1) => Some("Shree Cotton Mills".into()),
                (PartyKind::Driver, 4) => Some("Ramesh Patel".into()),
                _ => None,
            })
        }
    }

    #[tokio::test]
    async fn resolves_each_party_once_and_skips_missing() {
        let directory = Fixed {
            calls: AtomicUsize::new(0),
        };
        let names = resolve_names(
            &directory,
            vec![
                PartyRef::new(PartyKind::Consignor, 1),
                PartyRef::new(PartyKind::Consignor, 1),
                PartyRef::new(PartyKind::Driver, 4),
                PartyRef::new(PartyKind::Owner, 9),
            ],
        )
        .await
        .unwrap();

        assert_eq!(directory.calls.load(Ordering::SeqCst), 3);
        assert_eq!(names.len(), 2);
        assert_eq!(
            names[&PartyRef::new(PartyKind::Driver, 4)],
            "Ramesh Patel"
        );
    }

    #[tokio::test]
    async fn exists_follows_display_name() {
        let directory = Fixed {
            calls: AtomicUsize::new(0),
        };
        assert!(directory
            .exists(PartyRef::new(PartyKind::Consignor, 1))
            .await
            .unwrap());
        assert!(!directory
            .exists(PartyRef::new(PartyKind::Owner, 1))
            .await
            .unwrap());
    }

    #[test]
    fn display_uses_kind_label() {
        assert_eq!(
            PartyRef::new(PartyKind::Agent, 3).to_string(),
            "Booking agent 3"
        );
    }
}
