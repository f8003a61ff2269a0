//! services/client/src/services/storefront.rs
//!
//! The e-commerce side: catalogue, cart, favourites, orders and checkout.
//! Payment processing itself happens on the backend.

use std::fmt::Display;
use std::sync::Arc;

use serde_json::json;
use sysfree_core::domain::Record;
use sysfree_core::ports::PortResult;
use sysfree_core::query::QueryParams;
use sysfree_core::wire::ApiRequest;

use super::resource::Resource;
use crate::http::HttpClient;

const CART_PATH: &str = "/api/tienda/carrito/";
const FAVOURITES_PATH: &str = "/api/tienda/favoritos/";
const CHECKOUT_PATH: &str = "/api/tienda/checkout/";

#[derive(Clone)]
pub struct Storefront {
    http: Arc<HttpClient>,
}

impl Storefront {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    // --- Catalogue ---

    pub fn products(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/tienda/productos/")
    }

    pub fn categories(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/tienda/categorias/")
    }

    pub async fn featured_products(&self) -> PortResult<Record> {
        self.products().collection_query("destacados", &QueryParams::new()).await
    }

    pub async fn related_products(&self, product_id: impl Display) -> PortResult<Record> {
        self.products().item_query(product_id, "relacionados").await
    }

    pub async fn rate_product(&self, product_id: impl Display, rating: &Record) -> PortResult<Record> {
        self.products().action(product_id, "valorar", Some(rating)).await
    }

    // --- Cart ---

    pub async fn cart(&self) -> PortResult<Record> {
        self.http.send_json(ApiRequest::get(CART_PATH)).await
    }

    pub async fn add_to_cart(&self, item: &Record) -> PortResult<Record> {
        self.post_json(format!("{CART_PATH}agregar/"), item).await
    }

    pub async fn update_cart_quantity(&self, item_id: impl Display, quantity: &Record) -> PortResult<Record> {
        let request = ApiRequest::put(format!("{CART_PATH}items/{item_id}/")).with_json(quantity)?;
        self.http.send_json(request).await
    }

    pub async fn remove_cart_item(&self, item_id: impl Display) -> PortResult<()> {
        self.http
            .send_empty(ApiRequest::delete(format!("{CART_PATH}items/{item_id}/")))
            .await
    }

    pub async fn empty_cart(&self) -> PortResult<()> {
        self.http.send_empty(ApiRequest::delete(CART_PATH)).await
    }

    pub async fn apply_coupon(&self, coupon: &Record) -> PortResult<Record> {
        self.post_json(format!("{CART_PATH}aplicar-cupon/"), coupon).await
    }

    pub async fn remove_coupon(&self) -> PortResult<()> {
        self.http
            .send_empty(ApiRequest::delete(format!("{CART_PATH}cupon/")))
            .await
    }

    // --- Favourites ---

    pub async fn favourites(&self) -> PortResult<Record> {
        self.http.send_json(ApiRequest::get(FAVOURITES_PATH)).await
    }

    pub async fn add_favourite(&self, product_id: i64) -> PortResult<Record> {
        self.post_json(FAVOURITES_PATH.to_string(), &json!({ "producto_id": product_id }))
            .await
    }

    pub async fn remove_favourite(&self, product_id: impl Display) -> PortResult<()> {
        self.http
            .send_empty(ApiRequest::delete(format!("{FAVOURITES_PATH}{product_id}/")))
            .await
    }

    // --- Orders and checkout ---

    pub fn orders(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/tienda/pedidos/")
    }

    pub async fn cancel_order(&self, order_id: impl Display) -> PortResult<Record> {
        self.orders().action(order_id, "cancelar", None).await
    }

    pub async fn process_payment(&self, payment: &Record) -> PortResult<Record> {
        self.post_json(format!("{CHECKOUT_PATH}procesar-pago/"), payment).await
    }

    pub async fn verify_payment(&self, payment_id: impl Display) -> PortResult<Record> {
        self.http
            .send_json(ApiRequest::get(format!("{CHECKOUT_PATH}verificar-pago/{payment_id}/")))
            .await
    }

    async fn post_json(&self, path: String, body: &Record) -> PortResult<Record> {
        let request = ApiRequest::post(path).with_json(body)?;
        self.http.send_json(request).await
    }
}
