//! crates/sysfree_core/src/forms.rs
//!
//! Field-level validation for the entry forms. Each validator returns every
//! failing field with its message so a view can show them inline; an empty
//! map means the form may be submitted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::validators::{validate_national_id, validate_tax_id};

/// Field name to message.
pub type FieldErrors = BTreeMap<&'static str, String>;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Payment method that needs no reference number.
pub const CASH_METHOD: &str = "efectivo";

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message.to_string());
        false
    } else {
        true
    }
}

fn min_chars(errors: &mut FieldErrors, field: &'static str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min {
        errors.insert(field, message.to_string());
    }
}

fn email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if required(errors, field, value, "Email is required") && !EMAIL.is_match(value.trim()) {
        errors.insert(field, "Enter a valid email address".to_string());
    }
}

fn non_negative(errors: &mut FieldErrors, field: &'static str, value: Option<f64>, label: &str) {
    match value {
        None => {
            errors.insert(field, format!("{label} is required"));
        }
        Some(v) if v < 0.0 => {
            errors.insert(field, format!("{label} must be greater than or equal to 0"));
        }
        Some(_) => {}
    }
}

fn positive(errors: &mut FieldErrors, field: &'static str, value: Option<f64>, label: &str) {
    match value {
        None => {
            errors.insert(field, format!("{label} is required"));
        }
        Some(v) if v <= 0.0 => {
            errors.insert(field, format!("{label} must be positive"));
        }
        Some(_) => {}
    }
}

//=========================================================================================
// Login
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        email(&mut errors, "email", &self.email);
        required(&mut errors, "password", &self.password, "Password is required");
        errors
    }
}

//=========================================================================================
// Customer
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    /// `cedula`, `ruc`, `pasaporte`, ...
    pub id_type: String,
    pub identification: String,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
}

impl CustomerForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "tipo_identificacion", &self.id_type, "Identification type is required");

        if required(&mut errors, "identificacion", &self.identification, "Identification is required") {
            min_chars(
                &mut errors,
                "identificacion",
                &self.identification,
                5,
                "Identification must have at least 5 characters",
            );
            let id = self.identification.trim();
            let checksum_ok = match self.id_type.as_str() {
                "cedula" => validate_national_id(id),
                "ruc" => validate_tax_id(id),
                _ => true,
            };
            if !checksum_ok && !errors.contains_key("identificacion") {
                errors.insert("identificacion", "Identification is not valid".to_string());
            }
        }

        if required(&mut errors, "nombres", &self.first_names, "First names are required") {
            min_chars(&mut errors, "nombres", &self.first_names, 2, "First names must have at least 2 characters");
        }
        if required(&mut errors, "apellidos", &self.last_names, "Last names are required") {
            min_chars(&mut errors, "apellidos", &self.last_names, 2, "Last names must have at least 2 characters");
        }
        email(&mut errors, "email", &self.email);
        required(&mut errors, "telefono", &self.phone, "Phone is required");
        required(&mut errors, "direccion", &self.address, "Address is required");
        required(&mut errors, "ciudad", &self.city, "City is required");
        required(&mut errors, "provincia", &self.province, "Province is required");
        errors
    }
}

//=========================================================================================
// Product
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub stock: Option<f64>,
    pub minimum_stock: Option<f64>,
    pub category: Option<i64>,
    pub vat: Option<f64>,
}

impl ProductForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "codigo", &self.code, "Code is required");
        if required(&mut errors, "nombre", &self.name, "Name is required") {
            min_chars(&mut errors, "nombre", &self.name, 3, "Name must have at least 3 characters");
        }
        non_negative(&mut errors, "precio_compra", self.purchase_price, "Purchase price");
        non_negative(&mut errors, "precio_venta", self.sale_price, "Sale price");
        if let (Some(purchase), Some(sale)) = (self.purchase_price, self.sale_price) {
            // A zero price on either side skips the comparison.
            if purchase != 0.0 && sale != 0.0 && sale < purchase && !errors.contains_key("precio_venta") {
                errors.insert(
                    "precio_venta",
                    "Sale price must be greater than the purchase price".to_string(),
                );
            }
        }
        non_negative(&mut errors, "stock", self.stock, "Stock");
        non_negative(&mut errors, "stock_minimo", self.minimum_stock, "Minimum stock");
        if self.category.is_none() {
            errors.insert("categoria", "Category is required".to_string());
        }
        non_negative(&mut errors, "iva", self.vat, "VAT");
        errors
    }
}

//=========================================================================================
// Sale
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct SaleLine {
    pub product_id: Option<i64>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SaleForm {
    pub customer_id: Option<i64>,
    pub document_type: String,
    pub lines: Vec<SaleLine>,
}

impl SaleForm {
    /// Line errors are reported under `items`, naming the first failing line.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.customer_id.is_none() {
            errors.insert("cliente_id", "Customer is required".to_string());
        }
        required(&mut errors, "tipo", &self.document_type, "Document type is required");

        if self.lines.is_empty() {
            errors.insert("items", "Add at least one product".to_string());
        }
        for (index, line) in self.lines.iter().enumerate() {
            let mut line_errors = FieldErrors::new();
            if line.product_id.is_none() {
                line_errors.insert("producto_id", "Product is required".to_string());
            }
            positive(&mut line_errors, "cantidad", line.quantity, "Quantity");
            positive(&mut line_errors, "precio_unitario", line.unit_price, "Price");
            if line.discount.is_some_and(|d| d < 0.0) {
                line_errors.insert("descuento", "Discount cannot be negative".to_string());
            }
            if let Some((_, message)) = line_errors.into_iter().next() {
                errors.insert("items", format!("Line {}: {message}", index + 1));
                break;
            }
        }
        errors
    }
}

//=========================================================================================
// Payment
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub method: String,
    pub amount: Option<f64>,
    pub reference: String,
}

impl PaymentForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "metodo", &self.method, "Payment method is required");
        positive(&mut errors, "monto", self.amount, "Amount");
        if self.method != CASH_METHOD {
            required(
                &mut errors,
                "referencia",
                &self.reference,
                "A reference is required for this payment method",
            );
        }
        errors
    }
}
