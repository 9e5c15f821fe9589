//! Plain-text receipt for a filed return.

use crate::filing::domain::Filing;
use minijinja::Environment;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

const RECEIPT_TEMPLATE: &str = "\
ITR Filed Successfully
Acknowledgement number: {{ acknowledgement_number }}
Assessment year: {{ assessment_year }}
Form: {{ itr_form }}
Filed at: {{ filed_at }}
Taxable income: {{ taxable_income }}
{% if refund_due %}Refund due: {{ refund }}{% else %}Tax payable: {{ tax_payable }}{% endif %}
";

/// Error raised while rendering a receipt.
#[derive(Debug, Error)]
#[error("failed to render acknowledgement receipt: {0}")]
pub struct ReceiptRenderError(#[from] minijinja::Error);

/// Values printed on a filing receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcknowledgementReceipt {
    /// Issued acknowledgement number.
    pub acknowledgement_number: String,
    /// Assessment year, `YYYY-YYYY`.
    pub assessment_year: String,
    /// Return form.
    pub itr_form: String,
    /// Filing timestamp, formatted for display.
    pub filed_at: String,
    /// Taxable income from the filing's snapshot.
    pub taxable_income: Decimal,
    /// Tax still owed.
    pub tax_payable: Decimal,
    /// Refund due.
    pub refund: Decimal,
    refund_due: bool,
}

impl AcknowledgementReceipt {
    /// Builds the receipt for a filed return; `None` if not yet filed.
    #[must_use]
    pub fn from_filing(filing: &Filing) -> Option<Self> {
        let acknowledgement = filing.acknowledgement()?;
        let calculation = filing.tax_calculation();
        Some(Self {
            acknowledgement_number: acknowledgement.number.to_string(),
            assessment_year: filing.assessment_year().to_string(),
            itr_form: filing.inputs().itr_form.to_string(),
            filed_at: acknowledgement
                .filed_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            taxable_income: calculation.taxable_income,
            tax_payable: calculation.tax_payable,
            refund: calculation.refund,
            refund_due: calculation.refund > Decimal::ZERO,
        })
    }

    /// Renders the receipt as plain text.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptRenderError`] when the template engine fails.
    pub fn render(&self) -> Result<String, ReceiptRenderError> {
        Ok(Environment::new().render_str(RECEIPT_TEMPLATE, self)?)
    }
}
