//! services/client/src/services/backoffice.rs
//!
//! Back-office collections: inventory, customers, sales, repair orders and
//! accounting. Each group exposes its collections as `Resource`s plus the
//! named actions the backend offers on them.

use std::fmt::Display;
use std::sync::Arc;

use sysfree_core::domain::Record;
use sysfree_core::ports::PortResult;
use sysfree_core::query::QueryParams;
use sysfree_core::wire::ApiRequest;

use super::resource::Resource;
use crate::http::HttpClient;

//=========================================================================================
// Inventory
//=========================================================================================

#[derive(Clone)]
pub struct Inventory {
    http: Arc<HttpClient>,
}

impl Inventory {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn products(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/inventario/productos/")
    }

    pub fn categories(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/inventario/categorias/")
    }

    pub fn suppliers(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/inventario/proveedores/")
    }

    pub fn movements(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/inventario/movimientos/")
    }

    /// Records stock coming in for a product.
    pub async fn register_entry(&self, product_id: impl Display, movement: &Record) -> PortResult<Record> {
        self.products().action(product_id, "registrar_entrada", Some(movement)).await
    }

    /// Records stock going out for a product.
    pub async fn register_exit(&self, product_id: impl Display, movement: &Record) -> PortResult<Record> {
        self.products().action(product_id, "registrar_salida", Some(movement)).await
    }
}

//=========================================================================================
// Customers
//=========================================================================================

#[derive(Clone)]
pub struct Customers {
    http: Arc<HttpClient>,
}

impl Customers {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn customers(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/clientes/clientes/")
    }

    pub fn addresses(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/clientes/direcciones/")
    }

    /// Free-text customer lookup used by the sale and repair forms.
    pub async fn search(&self, term: &str) -> PortResult<Record> {
        self.customers()
            .collection_query("buscar", &QueryParams::from_pairs([("termino", term)]))
            .await
    }
}

//=========================================================================================
// Sales
//=========================================================================================

#[derive(Clone)]
pub struct Sales {
    http: Arc<HttpClient>,
}

impl Sales {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn sales(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/ventas/ventas/")
    }

    pub fn payments(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/ventas/pagos/")
    }

    /// Sales are created through a dedicated endpoint that also books the lines.
    pub async fn create_sale(&self, sale: &Record) -> PortResult<Record> {
        self.sales().collection_action("crear_venta", Some(sale)).await
    }

    pub async fn register_payment(&self, sale_id: impl Display, payment: &Record) -> PortResult<Record> {
        self.sales().action(sale_id, "registrar_pago", Some(payment)).await
    }

    pub async fn change_status(&self, sale_id: impl Display, status: &Record) -> PortResult<Record> {
        self.sales().action(sale_id, "cambiar_estado", Some(status)).await
    }

    pub async fn void_sale(&self, sale_id: impl Display, reason: &Record) -> PortResult<Record> {
        self.sales().action(sale_id, "anular", Some(reason)).await
    }
}

//=========================================================================================
// Repair orders
//=========================================================================================

#[derive(Clone)]
pub struct Repairs {
    http: Arc<HttpClient>,
}

impl Repairs {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn repairs(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/reparaciones/reparaciones/")
    }

    pub async fn change_status(&self, repair_id: impl Display, status: &Record) -> PortResult<Record> {
        self.repairs().action(repair_id, "cambiar_estado", Some(status)).await
    }

    pub async fn register_diagnosis(&self, repair_id: impl Display, diagnosis: &Record) -> PortResult<Record> {
        self.repairs().action(repair_id, "diagnostico", Some(diagnosis)).await
    }

    pub async fn register_solution(&self, repair_id: impl Display, solution: &Record) -> PortResult<Record> {
        self.repairs().action(repair_id, "solucion", Some(solution)).await
    }

    pub async fn add_part(&self, repair_id: impl Display, part: &Record) -> PortResult<Record> {
        self.repairs().action(repair_id, "agregar_repuesto", Some(part)).await
    }
}

//=========================================================================================
// Accounting
//=========================================================================================

#[derive(Clone)]
pub struct Accounting {
    http: Arc<HttpClient>,
}

impl Accounting {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub fn journal_entries(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/fiscal/asientos/")
    }

    pub fn accounts(&self) -> Resource {
        Resource::new(self.http.clone(), "/api/fiscal/cuentas/")
    }

    pub async fn approve_entry(&self, entry_id: impl Display) -> PortResult<Record> {
        self.journal_entries().action(entry_id, "aprobar", None).await
    }

    pub async fn void_entry(&self, entry_id: impl Display, reason: &Record) -> PortResult<Record> {
        self.journal_entries().action(entry_id, "anular", Some(reason)).await
    }

    pub async fn journal_book(&self, params: &QueryParams) -> PortResult<Record> {
        self.report("/api/fiscal/libro-diario/", params).await
    }

    pub async fn general_ledger(&self, params: &QueryParams) -> PortResult<Record> {
        self.report("/api/fiscal/libro-mayor/", params).await
    }

    pub async fn balance_sheet(&self, params: &QueryParams) -> PortResult<Record> {
        self.report("/api/fiscal/balance-general/", params).await
    }

    pub async fn income_statement(&self, params: &QueryParams) -> PortResult<Record> {
        self.report("/api/fiscal/estado-resultados/", params).await
    }

    async fn report(&self, path: &str, params: &QueryParams) -> PortResult<Record> {
        self.http
            .send_json(ApiRequest::get(path).with_query(params.to_pairs()))
            .await
    }
}
