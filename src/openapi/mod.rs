use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transport API",
        version = "0.1.0",
        description = r#"
# Road-transport back office

Orders are booked against consignors, consignees or booking agents. Issuing a
builty (lorry receipt) against an order dispatches it; parties picked on
either record are kept in step with the other.

## Request formats

Every mutation accepts `application/x-www-form-urlencoded` or JSON with the
same flat field names.

## Response modes

Send `X-Requested-With: XMLHttpRequest` or `Accept: application/json` to get a
JSON envelope back:

```json
{ "success": true, "message": "Order #12 created", "redirect_url": "/api/v1/orders/12", "data": { } }
```

Otherwise a successful mutation answers `303 See Other` with a `Location`
header. Failures always return the JSON error body:

```json
{
  "success": false,
  "error": "Bad Request",
  "message": "Validation failed",
  "errors": [{ "field": "driver_id", "message": "Driver is required" }]
}
```
        "#,
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "orders", description = "Order booking and status"),
        (name = "builty", description = "Dispatch receipts"),
        (name = "phonebook", description = "Concerned persons and their phone numbers"),
        (name = "reference", description = "Stations, goods, parties and fleet"),
        (name = "audit", description = "Transaction log"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Orders
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::delete_order,

        // Builty
        crate::handlers::builty::list_builty,
        crate::handlers::builty::get_builty,
        crate::handlers::builty::builty_draft,
        crate::handlers::builty::create_builty,
        crate::handlers::builty::update_builty,

        // Phone book
        crate::handlers::phonebook::search_phones,
        crate::handlers::phonebook::add_person,
        crate::handlers::phonebook::set_primary_person,
        crate::handlers::phonebook::list_entity_persons,
        crate::handlers::phonebook::list_entity_phones,
        crate::handlers::phonebook::list_person_phones,
        crate::handlers::phonebook::add_phone,
        crate::handlers::phonebook::update_phone,
        crate::handlers::phonebook::set_primary_phone,
        crate::handlers::phonebook::delete_phone,

        // Reference data
        crate::handlers::reference::lookup,
        crate::handlers::reference::quick_create,
        crate::handlers::reference::list_reference,
        crate::handlers::reference::get_reference,
        crate::handlers::reference::update_reference,

        // Audit and health
        crate::handlers::audit::list_transaction_logs,
        crate::handlers::health::health_check,
        crate::handlers::health::status,
    ),
    components(
        schemas(
            crate::services::orders::OrderInput,
            crate::services::orders::StatusInput,
            crate::services::orders::OrderView,
            crate::services::builty::BuiltyInput,
            crate::services::builty::BuiltyView,
            crate::services::builty::BuiltyDraft,
            crate::services::phonebook::PersonInput,
            crate::services::phonebook::PhoneInput,
            crate::services::phonebook::PhoneUpdate,
            crate::services::phonebook::PersonView,
            crate::services::phonebook::PhoneView,
            crate::services::phonebook::PhoneSearchResult,
            crate::services::reference::LookupItem,
            crate::services::reference::QuickCreateInput,
            crate::services::reference::QuickCreated,
            crate::services::reference::ReferenceKind,
            crate::entities::order::Model,
            crate::entities::builty::Model,
            crate::entities::transaction_log::Model,
            crate::errors::FieldError,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route_group() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Transport API"));
        for path in [
            "/api/v1/orders/{id}/status",
            "/api/v1/builty/draft",
            "/api/v1/phonebook/search",
            "/api/v1/lookup/{kind}",
            "/api/v1/transaction-logs",
        ] {
            assert!(json.contains(path), "missing {path}");
        }
    }
}
