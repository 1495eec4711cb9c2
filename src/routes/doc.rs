use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        analytics::{TopClient, TopClientList, TopSeller, TopSellerList},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        clients::{ClientList, CreateClientRequest, UpdateClientRequest},
        orders::{
            CreateOrderRequest, OrderDetailList, OrderLineInput, OrderList, OrderWithLines,
            UpdateOrderRequest,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    models::{Client, Order, OrderLine, OrderStatus, Product, User},
    response::{ApiResponse, Meta},
    routes::{analytics, auth, clients, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        products::list_products,
        products::search_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        clients::list_clients,
        clients::list_my_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        orders::list_orders,
        orders::list_my_orders,
        orders::list_orders_by_status,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        analytics::top_clients,
        analytics::top_sellers
    ),
    components(
        schemas(
            User,
            Product,
            Client,
            Order,
            OrderLine,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateClientRequest,
            UpdateClientRequest,
            ClientList,
            CreateOrderRequest,
            UpdateOrderRequest,
            OrderLineInput,
            OrderList,
            OrderDetailList,
            OrderWithLines,
            TopClient,
            TopSeller,
            TopClientList,
            TopSellerList,
            params::Pagination,
            params::SearchQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Client>,
            ApiResponse<ClientList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderList>,
            ApiResponse<OrderDetailList>,
            ApiResponse<TopClientList>,
            ApiResponse<TopSellerList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Seller registration and login"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Clients", description = "Client directory endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Analytics", description = "Ranked sales summaries"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
