use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::delivery::DeliveryAssessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    Cod,
    #[serde(rename = "E-Wallet")]
    EWallet,
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::EWallet => "E-Wallet",
            PaymentMethod::CreditCard => "CreditCard",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" => Ok(PaymentMethod::Cod),
            "E-Wallet" => Ok(PaymentMethod::EWallet),
            "CreditCard" => Ok(PaymentMethod::CreditCard),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Free-text fields of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    ContactName,
    ContactPhone,
    AreaName,
    StreetDetail,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormField::ContactName => "recipient name",
            FormField::ContactPhone => "phone",
            FormField::AreaName => "area",
            FormField::StreetDetail => "street detail",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub food_item_id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    pub contact_name: String,
    pub contact_phone: String,
    pub street_detail: String,
    pub area_name: String,
    pub formatted_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub assessment: DeliveryAssessment,
}

impl OrderDraft {
    pub fn new(assessment: DeliveryAssessment) -> Self {
        Self {
            contact_name: String::new(),
            contact_phone: String::new(),
            street_detail: String::new(),
            area_name: String::new(),
            formatted_address: None,
            payment_method: PaymentMethod::default(),
            assessment,
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::ContactName => &self.contact_name,
            FormField::ContactPhone => &self.contact_phone,
            FormField::AreaName => &self.area_name,
            FormField::StreetDetail => &self.street_detail,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::ContactName => self.contact_name = value,
            FormField::ContactPhone => self.contact_phone = value,
            FormField::AreaName => self.area_name = value,
            FormField::StreetDetail => self.street_detail = value,
        }
    }

    /// First required field left blank, in form order.
    pub fn first_missing(&self) -> Option<FormField> {
        [
            FormField::ContactName,
            FormField::ContactPhone,
            FormField::AreaName,
            FormField::StreetDetail,
        ]
        .into_iter()
        .find(|f| self.field(*f).trim().is_empty())
    }

    pub fn area(&self) -> Option<&str> {
        let area = self.area_name.trim();
        (!area.is_empty()).then_some(area)
    }
}
