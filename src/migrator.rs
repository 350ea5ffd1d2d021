use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_reference_tables::Migration),
            Box::new(m20240601_000002_create_party_tables::Migration),
            Box::new(m20240601_000003_create_fleet_tables::Migration),
            Box::new(m20240601_000004_create_phone_directory_tables::Migration),
            Box::new(m20240601_000005_create_orders_table::Migration),
            Box::new(m20240601_000006_create_builty_table::Migration),
            Box::new(m20240601_000007_create_transaction_logs_table::Migration),
        ]
    }
}

fn created_at<T: IntoIden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn nullable_fk<F, T, C>(
    name: &str,
    from_table: F,
    from_col: C,
    to_table: T,
    on_delete: ForeignKeyAction,
) -> ForeignKeyCreateStatement
where
    F: IntoIden + 'static,
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(from_table, from_col)
        .to(to_table, tables::Id)
        .on_delete(on_delete)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

async fn index(
    manager: &SchemaManager<'_>,
    name: &str,
    table: impl IntoIden + 'static,
    col: impl IntoIden + 'static,
) -> Result<(), DbErr> {
    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name(name)
                .table(table)
                .col(col)
                .to_owned(),
        )
        .await
}

mod m20240601_000001_create_reference_tables {
    use super::tables::*;
    use super::{created_at, nullable_fk};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_reference_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Stations::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Stations::Name).string_len(128).not_null().unique_key())
                        .col(ColumnDef::new(Stations::State).string_len(64).null())
                        .col(&mut created_at(CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PinCodes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(PinCodes::Code).string_len(10).not_null().unique_key())
                        .col(ColumnDef::new(PinCodes::State).string_len(64).null())
                        .col(ColumnDef::new(PinCodes::StationId).integer().null())
                        .col(&mut created_at(CreatedAt))
                        .foreign_key(&mut nullable_fk(
                            "fk_pin_codes_station_id",
                            PinCodes::Table,
                            PinCodes::StationId,
                            Stations::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Goods::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(
                            ColumnDef::new(Goods::Description)
                                .string_len(255)
                                .not_null()
                                .unique_key(),
                        )
                        .col(&mut created_at(CreatedAt))
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Goods::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PinCodes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stations::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000002_create_party_tables {
    use super::tables::*;
    use super::{created_at, index, nullable_fk};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_party_tables"
        }
    }

    /// Consignors and consignees share one column layout.
    fn trading_party(table: Parties, prefix: &str) -> TableCreateStatement {
        Table::create()
            .table(table.clone())
            .if_not_exists()
            .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
            .col(ColumnDef::new(Parties::Name).string_len(255).not_null())
            .col(ColumnDef::new(Parties::Address).string_len(512).null())
            .col(ColumnDef::new(Parties::Gstin).string_len(32).null().unique_key())
            .col(ColumnDef::new(Parties::Pan).string_len(16).null())
            .col(ColumnDef::new(Parties::StationId).integer().null())
            .col(ColumnDef::new(Parties::PinCodeId).integer().null())
            .col(ColumnDef::new(Parties::Phone).string_len(32).null())
            .col(ColumnDef::new(Parties::Email).string_len(128).null())
            .col(ColumnDef::new(Parties::HolidayInfo).string_len(255).null())
            .col(&mut created_at(CreatedAt))
            .foreign_key(&mut nullable_fk(
                &format!("fk_{}_station_id", prefix),
                table.clone(),
                Parties::StationId,
                Stations::Table,
                ForeignKeyAction::SetNull,
            ))
            .foreign_key(&mut nullable_fk(
                &format!("fk_{}_pin_code_id", prefix),
                table.clone(),
                Parties::PinCodeId,
                PinCodes::Table,
                ForeignKeyAction::SetNull,
            ))
            .index(
                Index::create()
                    .name(&format!("uq_{}_name_station", prefix))
                    .col(Parties::Name)
                    .col(Parties::StationId)
                    .unique(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(trading_party(Parties::Consignors, "consignors"))
                .await?;
            manager
                .create_table(trading_party(Parties::Consignees, "consignees"))
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BookingAgents::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(BookingAgents::Name).string_len(255).not_null())
                        .col(ColumnDef::new(BookingAgents::Phone).string_len(32).null())
                        .col(ColumnDef::new(BookingAgents::Gstin).string_len(32).null())
                        .col(ColumnDef::new(BookingAgents::Pan).string_len(16).null())
                        .col(ColumnDef::new(BookingAgents::StationId).integer().null())
                        .col(ColumnDef::new(BookingAgents::City).string_len(64).null())
                        .col(ColumnDef::new(BookingAgents::State).string_len(64).null())
                        .col(ColumnDef::new(BookingAgents::Email).string_len(128).null())
                        .col(&mut created_at(CreatedAt))
                        .foreign_key(&mut nullable_fk(
                            "fk_booking_agents_station_id",
                            BookingAgents::Table,
                            BookingAgents::StationId,
                            Stations::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .to_owned(),
                )
                .await?;

            index(manager, "idx_booking_agents_name", BookingAgents::Table, BookingAgents::Name).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BookingAgents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Parties::Consignees).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Parties::Consignors).to_owned())
                .await
        }
    }
}

mod m20240601_000003_create_fleet_tables {
    use super::tables::*;
    use super::{created_at, nullable_fk};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_fleet_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Owners::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Owners::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Owners::Phone).string_len(32).null())
                        .col(ColumnDef::new(Owners::Pan).string_len(16).null())
                        .col(ColumnDef::new(Owners::Aadhar).string_len(16).null())
                        .col(ColumnDef::new(Owners::Address).string_len(512).null())
                        .col(&mut created_at(CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Drivers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Drivers::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Drivers::Address).string_len(512).null())
                        .col(ColumnDef::new(Drivers::LicenseNo).string_len(64).null().unique_key())
                        .col(ColumnDef::new(Drivers::Validity).date().null())
                        .col(ColumnDef::new(Drivers::Rto).string_len(64).null())
                        .col(ColumnDef::new(Drivers::Aadhar).string_len(16).null())
                        .col(ColumnDef::new(Drivers::Phone).string_len(32).null())
                        .col(&mut created_at(CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Vehicles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Vehicles::LorryNo).string_len(32).not_null().unique_key())
                        .col(ColumnDef::new(Vehicles::Capacity).double().null())
                        .col(ColumnDef::new(Vehicles::ChassisNo).string_len(64).null())
                        .col(ColumnDef::new(Vehicles::EngineNo).string_len(64).null())
                        .col(ColumnDef::new(Vehicles::OwnerId).integer().null())
                        .col(ColumnDef::new(Vehicles::DriverId).integer().null())
                        .col(ColumnDef::new(Vehicles::InsuranceStatus).string_len(64).null())
                        .col(&mut created_at(CreatedAt))
                        .foreign_key(&mut nullable_fk(
                            "fk_vehicles_owner_id",
                            Vehicles::Table,
                            Vehicles::OwnerId,
                            Owners::Table,
                            ForeignKeyAction::Restrict,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_vehicles_driver_id",
                            Vehicles::Table,
                            Vehicles::DriverId,
                            Drivers::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Drivers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Owners::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000004_create_phone_directory_tables {
    use super::tables::*;
    use super::{created_at, index, nullable_fk};
    use sea_orm::ConnectionTrait;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_phone_directory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ConcernedPersons::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(ConcernedPersons::EntityType).string_len(16).not_null())
                        .col(ColumnDef::new(ConcernedPersons::EntityId).integer().not_null())
                        .col(ColumnDef::new(ConcernedPersons::Name).string_len(255).not_null())
                        .col(ColumnDef::new(ConcernedPersons::Designation).string_len(128).null())
                        .col(
                            ColumnDef::new(ConcernedPersons::IsPrimary)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(&mut created_at(CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_concerned_persons_entity")
                        .table(ConcernedPersons::Table)
                        .col(ConcernedPersons::EntityType)
                        .col(ConcernedPersons::EntityId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PhoneBook::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(PhoneBook::ConcernedPersonId).integer().not_null())
                        .col(
                            ColumnDef::new(PhoneBook::PhoneNumber)
                                .string_len(32)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PhoneBook::IsPrimary)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(PhoneBook::Label).string_len(64).null())
                        .col(&mut created_at(CreatedAt))
                        .foreign_key(&mut nullable_fk(
                            "fk_phone_book_concerned_person_id",
                            PhoneBook::Table,
                            PhoneBook::ConcernedPersonId,
                            ConcernedPersons::Table,
                            ForeignKeyAction::Cascade,
                        ))
                        .to_owned(),
                )
                .await?;

            index(
                manager,
                "idx_phone_book_concerned_person_id",
                PhoneBook::Table,
                PhoneBook::ConcernedPersonId,
            )
            .await?;

            // One primary row per owner; non-primary rows are unconstrained.
            let conn = manager.get_connection();
            conn.execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_concerned_persons_primary \
                 ON concerned_persons (entity_type, entity_id) WHERE is_primary",
            )
            .await?;
            conn.execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_phone_book_primary \
                 ON phone_book (concerned_person_id) WHERE is_primary",
            )
            .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PhoneBook::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ConcernedPersons::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000005_create_orders_table {
    use super::tables::*;
    use super::{created_at, index, nullable_fk};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Orders::Date).date().not_null())
                        .col(ColumnDef::new(Orders::Firm).text().not_null())
                        .col(ColumnDef::new(Orders::OrderType).text().not_null())
                        .col(ColumnDef::new(Orders::FromStationId).integer().null())
                        .col(ColumnDef::new(Orders::ToStationId).integer().null())
                        .col(ColumnDef::new(Orders::ConsignorId).integer().null())
                        .col(ColumnDef::new(Orders::ConsigneeId).integer().null())
                        .col(ColumnDef::new(Orders::BookingAgentId).integer().null())
                        .col(ColumnDef::new(Orders::ConsignorPersonId).integer().null())
                        .col(ColumnDef::new(Orders::ConsignorPhoneId).integer().null())
                        .col(ColumnDef::new(Orders::ConsigneePersonId).integer().null())
                        .col(ColumnDef::new(Orders::ConsigneePhoneId).integer().null())
                        .col(ColumnDef::new(Orders::AgentPersonId).integer().null())
                        .col(ColumnDef::new(Orders::AgentPhoneId).integer().null())
                        .col(ColumnDef::new(Orders::GoodsId).integer().not_null())
                        .col(ColumnDef::new(Orders::Weight).double().null())
                        .col(ColumnDef::new(Orders::Rate).double().null())
                        .col(ColumnDef::new(Orders::Description).string_len(512).null())
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string_len(32)
                                .not_null()
                                .default("NEW"),
                        )
                        .col(ColumnDef::new(Orders::Version).integer().not_null().default(1))
                        .col(&mut created_at(CreatedAt))
                        .col(&mut created_at(UpdatedAt))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_from_station_id",
                            Orders::Table,
                            Orders::FromStationId,
                            Stations::Table,
                            ForeignKeyAction::Restrict,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_to_station_id",
                            Orders::Table,
                            Orders::ToStationId,
                            Stations::Table,
                            ForeignKeyAction::Restrict,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_consignor_id",
                            Orders::Table,
                            Orders::ConsignorId,
                            Parties::Consignors,
                            ForeignKeyAction::Restrict,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_consignee_id",
                            Orders::Table,
                            Orders::ConsigneeId,
                            Parties::Consignees,
                            ForeignKeyAction::Restrict,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_booking_agent_id",
                            Orders::Table,
                            Orders::BookingAgentId,
                            BookingAgents::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_goods_id",
                            Orders::Table,
                            Orders::GoodsId,
                            Goods::Table,
                            ForeignKeyAction::Restrict,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_consignor_person_id",
                            Orders::Table,
                            Orders::ConsignorPersonId,
                            ConcernedPersons::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_consignor_phone_id",
                            Orders::Table,
                            Orders::ConsignorPhoneId,
                            PhoneBook::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_consignee_person_id",
                            Orders::Table,
                            Orders::ConsigneePersonId,
                            ConcernedPersons::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_consignee_phone_id",
                            Orders::Table,
                            Orders::ConsigneePhoneId,
                            PhoneBook::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_agent_person_id",
                            Orders::Table,
                            Orders::AgentPersonId,
                            ConcernedPersons::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .foreign_key(&mut nullable_fk(
                            "fk_orders_agent_phone_id",
                            Orders::Table,
                            Orders::AgentPhoneId,
                            PhoneBook::Table,
                            ForeignKeyAction::SetNull,
                        ))
                        .to_owned(),
                )
                .await?;

            index(manager, "idx_orders_status", Orders::Table, Orders::Status).await?;
            index(manager, "idx_orders_date", Orders::Table, Orders::Date).await?;
            index(manager, "idx_orders_created_at", Orders::Table, CreatedAt).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000006_create_builty_table {
    use super::tables::*;
    use super::{created_at, index, nullable_fk};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000006_create_builty_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let set_null = [
                ("fk_builty_goods_id", Builty::GoodsId, Goods::Table.into_iden()),
                ("fk_builty_consignor_id", Builty::ConsignorId, Parties::Consignors.into_iden()),
                ("fk_builty_consignee_id", Builty::ConsigneeId, Parties::Consignees.into_iden()),
                ("fk_builty_booking_agent_id", Builty::BookingAgentId, BookingAgents::Table.into_iden()),
                ("fk_builty_consignor_person_id", Builty::ConsignorPersonId, ConcernedPersons::Table.into_iden()),
                ("fk_builty_consignor_phone_id", Builty::ConsignorPhoneId, PhoneBook::Table.into_iden()),
                ("fk_builty_consignee_person_id", Builty::ConsigneePersonId, ConcernedPersons::Table.into_iden()),
                ("fk_builty_consignee_phone_id", Builty::ConsigneePhoneId, PhoneBook::Table.into_iden()),
                ("fk_builty_agent_person_id", Builty::AgentPersonId, ConcernedPersons::Table.into_iden()),
                ("fk_builty_agent_phone_id", Builty::AgentPhoneId, PhoneBook::Table.into_iden()),
            ];
            let restrict = [
                ("fk_builty_vehicle_id", Builty::VehicleId, Vehicles::Table.into_iden()),
                ("fk_builty_driver_id", Builty::DriverId, Drivers::Table.into_iden()),
                ("fk_builty_owner_id", Builty::OwnerId, Owners::Table.into_iden()),
                ("fk_builty_from_station_id", Builty::FromStationId, Stations::Table.into_iden()),
                ("fk_builty_to_station_id", Builty::ToStationId, Stations::Table.into_iden()),
            ];

            let mut table = Table::create()
                .table(Builty::Table)
                .if_not_exists()
                .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Builty::OrderId).integer().not_null().unique_key())
                .col(ColumnDef::new(Builty::VehicleId).integer().not_null())
                .col(ColumnDef::new(Builty::DriverId).integer().not_null())
                .col(ColumnDef::new(Builty::OwnerId).integer().not_null())
                .col(ColumnDef::new(Builty::Date).date().not_null())
                .col(ColumnDef::new(Builty::Firm).text().not_null())
                .col(ColumnDef::new(Builty::LrNo).string_len(64).null())
                .col(ColumnDef::new(Builty::FromStationId).integer().not_null())
                .col(ColumnDef::new(Builty::ToStationId).integer().not_null())
                .col(
                    ColumnDef::new(Builty::Status)
                        .string_len(32)
                        .not_null()
                        .default("IN_TRANSIT"),
                )
                .col(ColumnDef::new(Builty::InvoiceNo).string_len(64).null())
                .col(ColumnDef::new(Builty::EwayBillNo).string_len(64).null())
                .col(ColumnDef::new(Builty::GoodsId).integer().null())
                .col(ColumnDef::new(Builty::ActualWeight).double().null())
                .col(ColumnDef::new(Builty::ChargedWeight).double().null())
                .col(ColumnDef::new(Builty::Rate).double().null())
                .col(ColumnDef::new(Builty::AdvanceAmount).double().null())
                .col(ColumnDef::new(Builty::ConsignorId).integer().null())
                .col(ColumnDef::new(Builty::ConsigneeId).integer().null())
                .col(ColumnDef::new(Builty::BookingAgentId).integer().null())
                .col(ColumnDef::new(Builty::ConsignorPersonId).integer().null())
                .col(ColumnDef::new(Builty::ConsignorPhoneId).integer().null())
                .col(ColumnDef::new(Builty::ConsigneePersonId).integer().null())
                .col(ColumnDef::new(Builty::ConsigneePhoneId).integer().null())
                .col(ColumnDef::new(Builty::AgentPersonId).integer().null())
                .col(ColumnDef::new(Builty::AgentPhoneId).integer().null())
                .col(ColumnDef::new(Builty::Version).integer().not_null().default(1))
                .col(&mut created_at(CreatedAt))
                .col(&mut created_at(UpdatedAt))
                .foreign_key(&mut nullable_fk(
                    "fk_builty_order_id",
                    Builty::Table,
                    Builty::OrderId,
                    Orders::Table,
                    ForeignKeyAction::Cascade,
                ))
                .to_owned();

            for (name, col, target) in restrict {
                table.foreign_key(&mut nullable_fk(
                    name,
                    Builty::Table,
                    col,
                    target,
                    ForeignKeyAction::Restrict,
                ));
            }
            for (name, col, target) in set_null {
                table.foreign_key(&mut nullable_fk(
                    name,
                    Builty::Table,
                    col,
                    target,
                    ForeignKeyAction::SetNull,
                ));
            }

            manager.create_table(table).await?;

            index(manager, "idx_builty_status", Builty::Table, Builty::Status).await?;
            index(manager, "idx_builty_lr_no", Builty::Table, Builty::LrNo).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Builty::Table).to_owned())
                .await
        }
    }
}

mod m20240601_000007_create_transaction_logs_table {
    use super::tables::*;
    use super::created_at;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000007_create_transaction_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TransactionLogs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(TransactionLogs::Entity).string_len(64).not_null())
                        .col(ColumnDef::new(TransactionLogs::EntityId).integer().not_null())
                        .col(ColumnDef::new(TransactionLogs::Action).string_len(64).not_null())
                        .col(ColumnDef::new(TransactionLogs::Note).string_len(512).null())
                        .col(&mut created_at(TransactionLogs::At))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transaction_logs_entity")
                        .table(TransactionLogs::Table)
                        .col(TransactionLogs::Entity)
                        .col(TransactionLogs::EntityId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TransactionLogs::Table).to_owned())
                .await
        }
    }
}

/// Identifiers shared across migrations.
mod tables {
    use sea_orm_migration::prelude::*;

    #[derive(DeriveIden)]
    pub struct Id;

    #[derive(DeriveIden)]
    pub struct CreatedAt;

    #[derive(DeriveIden)]
    pub struct UpdatedAt;

    #[derive(DeriveIden)]
    pub enum Stations {
        Table,
        Name,
        State,
    }

    #[derive(DeriveIden)]
    pub enum PinCodes {
        Table,
        Code,
        State,
        StationId,
    }

    #[derive(DeriveIden)]
    pub enum Goods {
        Table,
        Description,
    }

    #[derive(DeriveIden, Clone)]
    pub enum Parties {
        Consignors,
        Consignees,
        Name,
        Address,
        Gstin,
        Pan,
        StationId,
        PinCodeId,
        Phone,
        Email,
        HolidayInfo,
    }

    #[derive(DeriveIden)]
    pub enum BookingAgents {
        Table,
        Name,
        Phone,
        Gstin,
        Pan,
        StationId,
        City,
        State,
        Email,
    }

    #[derive(DeriveIden)]
    pub enum Owners {
        Table,
        Name,
        Phone,
        Pan,
        Aadhar,
        Address,
    }

    #[derive(DeriveIden)]
    pub enum Drivers {
        Table,
        Name,
        Address,
        LicenseNo,
        Validity,
        Rto,
        Aadhar,
        Phone,
    }

    #[derive(DeriveIden)]
    pub enum Vehicles {
        Table,
        LorryNo,
        Capacity,
        ChassisNo,
        EngineNo,
        OwnerId,
        DriverId,
        InsuranceStatus,
    }

    #[derive(DeriveIden)]
    pub enum ConcernedPersons {
        Table,
        EntityType,
        EntityId,
        Name,
        Designation,
        IsPrimary,
    }

    #[derive(DeriveIden)]
    pub enum PhoneBook {
        Table,
        ConcernedPersonId,
        PhoneNumber,
        IsPrimary,
        Label,
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Date,
        Firm,
        OrderType,
        FromStationId,
        ToStationId,
        ConsignorId,
        ConsigneeId,
        BookingAgentId,
        ConsignorPersonId,
        ConsignorPhoneId,
        ConsigneePersonId,
        ConsigneePhoneId,
        AgentPersonId,
        AgentPhoneId,
        GoodsId,
        Weight,
        Rate,
        Description,
        Status,
        Version,
    }

    #[derive(DeriveIden)]
    pub enum Builty {
        #[sea_orm(iden = "builty")]
        Table,
        OrderId,
        VehicleId,
        DriverId,
        OwnerId,
        Date,
        Firm,
        LrNo,
        FromStationId,
        ToStationId,
        Status,
        InvoiceNo,
        EwayBillNo,
        GoodsId,
        ActualWeight,
        ChargedWeight,
        Rate,
        AdvanceAmount,
        ConsignorId,
        ConsigneeId,
        BookingAgentId,
        ConsignorPersonId,
        ConsignorPhoneId,
        ConsigneePersonId,
        ConsigneePhoneId,
        AgentPersonId,
        AgentPhoneId,
        Version,
    }

    #[derive(DeriveIden)]
    pub enum TransactionLogs {
        Table,
        Entity,
        EntityId,
        Action,
        Note,
        At,
    }
}
