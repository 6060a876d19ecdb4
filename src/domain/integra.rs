//! Integra export document.
//!
//! Field names and order follow the Integra transaction schema. Every
//! monetary or quantity field is a fixed-point decimal string.

use serde::Serialize;

pub const LOCATION_CODE: &str = "331670";
pub const TERMINAL_ID: &str = "01";
pub const SHIFT_NO: &str = "01";
pub const OP_CUR: &str = "INR";
pub const TRAN_STATUS: &str = "SALES";
pub const SALE_TYPE: &str = "DINE-IN";
pub const ITEM_REC_TYPE: &str = "G111";
/// Line amounts are reported tax-inclusive.
pub const ITEM_TAX_TYPE: &str = "I";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IntegraReport {
    #[serde(rename = "Transactions")]
    pub transactions: Vec<IntegraTransaction>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct IntegraTransaction {
    pub location_code: String,
    pub terminal_id: String,
    pub shift_no: String,
    pub rcpt_num: String,
    pub rcpt_dt: String,
    pub business_dt: String,
    pub rcpt_tm: String,
    pub inv_amt: String,
    pub tax_amt: String,
    pub ret_amt: String,
    pub service_charge_amt: String,
    pub packaging_amt: String,
    pub delivery_amt: String,
    pub sale_type: String,
    pub tran_status: String,
    pub op_cur: String,
    pub bc_exch: String,
    pub discount: String,
    #[serde(rename = "ItemDetail")]
    pub item_detail: Vec<ItemDetail>,
    #[serde(rename = "PaymentDetail")]
    pub payment_detail: Vec<PaymentDetail>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ItemDetail {
    pub rec_type: String,
    pub rcpt_num: String,
    pub rcpt_dt: String,
    pub item_code: String,
    pub item_name: String,
    pub item_qty: String,
    pub item_price: String,
    pub item_cat: String,
    pub item_tax: String,
    pub item_tax_type: String,
    pub item_net_amt: String,
    pub op_cur: String,
    pub bc_exch: String,
    pub item_status: String,
    pub item_discount: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PaymentDetail {
    pub rcpt_num: String,
    pub rcpt_dt: String,
    pub payment_name: String,
    pub currency_code: String,
    pub exchange_rate: String,
    pub tender_amount: String,
    pub op_cur: String,
    pub bc_exch: String,
    pub payment_status: String,
}
