use crate::domain::integra::{
    ITEM_REC_TYPE, ITEM_TAX_TYPE, IntegraReport, IntegraTransaction, ItemDetail, LOCATION_CODE,
    OP_CUR, PaymentDetail, SALE_TYPE, SHIFT_NO, TERMINAL_ID, TRAN_STATUS,
};
use crate::domain::money::{AMOUNT_DP, ITEM_TAX_DP, QUANTITY_DP, to_money};
use crate::domain::payment::{LineItem, Payment};
use crate::domain::timestamp::{ReceiptTime, ReportTimeZone};
use crate::error::IntegraError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Result of transforming a batch: the report plus the records left out of it.
#[derive(Debug, Default)]
pub struct TransformOutcome {
    pub report: IntegraReport,
    pub rejected: Vec<IntegraError>,
}

/// Maps upstream payment records onto the Integra transaction schema.
///
/// The transformer is stateless apart from the zone used to render receipt
/// dates, so one instance can be shared across requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegraTransformer {
    zone: ReportTimeZone,
}

impl IntegraTransformer {
    pub fn new(zone: ReportTimeZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> ReportTimeZone {
        self.zone
    }

    /// Transforms raw records in input order.
    ///
    /// Records that cannot be read as a payment, or that carry no usable
    /// timestamp, are skipped and reported in [`TransformOutcome::rejected`].
    pub fn transform(&self, records: &[Value]) -> TransformOutcome {
        let mut outcome = TransformOutcome::default();
        for (index, raw) in records.iter().enumerate() {
            match self.transform_record(index, raw) {
                Ok(transaction) => outcome.report.transactions.push(transaction),
                Err(e) => {
                    tracing::warn!("{}", e);
                    outcome.rejected.push(e);
                }
            }
        }
        outcome
    }

    fn transform_record(
        &self,
        index: usize,
        raw: &Value,
    ) -> Result<IntegraTransaction, IntegraError> {
        let reject = |reason: String| IntegraError::MalformedRecord { index, reason };
        if !raw.is_object() {
            return Err(reject("record is not an object".to_string()));
        }
        let payment = Payment::deserialize(raw).map_err(|e| reject(e.to_string()))?;
        let when = payment
            .timestamp_source()
            .ok_or_else(|| reject("missing createdAt/date".to_string()))?;
        let time = ReceiptTime::parse(when, self.zone)
            .ok_or_else(|| reject(format!("unparsable timestamp {}", when)))?;
        Ok(self.transform_payment(&payment, time))
    }

    /// Builds one transaction from an already validated payment.
    pub fn transform_payment(&self, payment: &Payment, time: ReceiptTime) -> IntegraTransaction {
        let receipt = payment.receipt_number();
        let rcpt_dt = time.date_code();
        let inv_amt = payment.invoice_total();
        let exchange = to_money(Some(Decimal::ONE), QUANTITY_DP);

        let item_detail = payment
            .bill_items
            .iter()
            .map(|item| item_detail(item, payment, &receipt, &rcpt_dt, &exchange))
            .collect();

        let payment_detail = vec![PaymentDetail {
            rcpt_num: receipt.clone(),
            rcpt_dt: rcpt_dt.clone(),
            payment_name: payment.payment_name(),
            currency_code: OP_CUR.to_string(),
            exchange_rate: exchange.clone(),
            tender_amount: to_money(Some(inv_amt), AMOUNT_DP),
            op_cur: OP_CUR.to_string(),
            bc_exch: exchange.clone(),
            payment_status: TRAN_STATUS.to_string(),
        }];

        IntegraTransaction {
            location_code: LOCATION_CODE.to_string(),
            terminal_id: TERMINAL_ID.to_string(),
            shift_no: SHIFT_NO.to_string(),
            rcpt_num: receipt,
            business_dt: rcpt_dt.clone(),
            rcpt_dt,
            rcpt_tm: time.time_code(),
            inv_amt: to_money(Some(inv_amt), AMOUNT_DP),
            tax_amt: to_money(Some(payment.tax_amount()), AMOUNT_DP),
            // Returns are not exported.
            ret_amt: to_money(None, AMOUNT_DP),
            service_charge_amt: to_money(Some(payment.service_charge_amount()), AMOUNT_DP),
            packaging_amt: to_money(None, AMOUNT_DP),
            delivery_amt: to_money(None, AMOUNT_DP),
            sale_type: SALE_TYPE.to_string(),
            tran_status: TRAN_STATUS.to_string(),
            op_cur: OP_CUR.to_string(),
            bc_exch: exchange,
            discount: to_money(Some(payment.discount_amount()), AMOUNT_DP),
            item_detail,
            payment_detail,
        }
    }
}

fn item_detail(
    item: &LineItem,
    payment: &Payment,
    receipt: &str,
    rcpt_dt: &str,
    exchange: &str,
) -> ItemDetail {
    ItemDetail {
        rec_type: ITEM_REC_TYPE.to_string(),
        rcpt_num: receipt.to_string(),
        rcpt_dt: rcpt_dt.to_string(),
        item_code: item.item_code(),
        item_name: item.item_name(),
        item_qty: to_money(Some(item.quantity()), QUANTITY_DP),
        item_price: to_money(Some(item.unit_price()), AMOUNT_DP),
        item_cat: item.category(),
        item_tax: to_money(Some(item.allocated_tax(payment)), ITEM_TAX_DP),
        item_tax_type: ITEM_TAX_TYPE.to_string(),
        item_net_amt: to_money(Some(item.net_amount()), AMOUNT_DP),
        op_cur: OP_CUR.to_string(),
        bc_exch: exchange.to_string(),
        item_status: TRAN_STATUS.to_string(),
        item_discount: to_money(Some(item.discount_amount()), AMOUNT_DP),
    }
}
