use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    auth, cart, categories, grades, prices, product_details, products, quotations, sizes,
    thicknesses,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plastics Quotation API",
        version = "0.1.0",
        description = r#"
# Plastics Quotation API

Catalog, pricing matrix, cart and quotations for plastic sheet materials.

## Authentication

Catalog reads are public. Cart endpoints and quotation submission require a
bearer token from `/auth/login`; every other mutation requires the `admin` role.

```
Authorization: Bearer <your-jwt-token>
```

## Responses

Reads return the resource JSON directly. Mutations return an envelope:

```json
{ "success": true, "data": { "id": 1 }, "message": "Created", "meta": { "timestamp": "..." } }
```

Errors carry `error`, `message`, `timestamp` and the `x-request-id` of the call.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:8080", description = "Local development")),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Catalog", description = "Categories and grades"),
        (name = "Products", description = "Products and series"),
        (name = "Dimensions", description = "Thicknesses and sheet sizes"),
        (name = "Pricing", description = "Price matrix per series, thickness and size"),
        (name = "Cart", description = "Signed-in user's cart"),
        (name = "Quotations", description = "Full-sheet and cut-to-size quotations")
    ),
    paths(
        auth::register,
        auth::login,
        categories::list_categories,
        categories::list_categories_with_grades,
        categories::get_category,
        categories::category_grades,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        grades::list_grades,
        grades::get_grade,
        grades::grades_by_category,
        grades::grades_by_type,
        grades::create_grade,
        grades::update_grade,
        grades::delete_grade,
        products::list_products,
        products::get_product,
        products::products_by_category,
        products::search_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::delete_all_products,
        product_details::list_product_details,
        product_details::get_product_detail,
        product_details::grade_details_with_prices,
        product_details::create_product_detail,
        product_details::update_product_detail,
        product_details::delete_product_detail,
        product_details::delete_all_product_details,
        thicknesses::list_thicknesses,
        thicknesses::get_thickness,
        thicknesses::create_thickness,
        thicknesses::update_thickness,
        thicknesses::delete_thickness,
        thicknesses::delete_all_thicknesses,
        sizes::list_sizes,
        sizes::get_size,
        sizes::create_size,
        sizes::update_size,
        sizes::delete_size,
        sizes::delete_all_sizes,
        prices::prices_by_grade,
        prices::create_price,
        prices::update_price,
        prices::delete_price,
        prices::delete_all_prices,
        cart::list_cart,
        cart::cart_total,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        quotations::list_full_sheets,
        quotations::list_cut_to_size,
        quotations::get_quotation,
        quotations::create_full_sheet,
        quotations::create_cut_to_size,
        quotations::delete_all_full_sheets,
        quotations::delete_all_cut_to_size,
    ),
    components(schemas(crate::errors::ErrorResponse, crate::auth::Role)),
    modifiers(&BearerAuth)
)]
pub struct ApiDocV1;

/// Registers the `Bearer` JWT scheme referenced by guarded paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_catalog_and_bearer_scheme() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Plastics Quotation API"));
        assert!(json.contains("/api/v1/prices/grade/{grade_id}"));
        assert!(json.contains("/api/v1/quotations/cut-to-size"));
        assert!(json.contains("/auth/login"));
        assert!(json.contains("\"Bearer\""));
    }
}
