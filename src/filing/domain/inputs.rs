//! Taxpayer-supplied inputs carried by a filing.
//!
//! These values may be pre-populated by document extraction before a filing
//! is created or updated; the filing itself only validates and stores them.

use super::{FilingDomainError, ParseItrFormError, Pan};
use crate::tax::{self, Regime, TaxAssessment, TaxInputs};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Income-tax return form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItrFormType {
    /// Salaried individuals with simple income.
    #[default]
    #[serde(rename = "ITR-1")]
    Itr1,
    /// Individuals without business income.
    #[serde(rename = "ITR-2")]
    Itr2,
    /// Individuals with business or professional income.
    #[serde(rename = "ITR-3")]
    Itr3,
    /// Presumptive taxation.
    #[serde(rename = "ITR-4")]
    Itr4,
}

impl ItrFormType {
    /// Returns the canonical form name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Itr1 => "ITR-1",
            Self::Itr2 => "ITR-2",
            Self::Itr3 => "ITR-3",
            Self::Itr4 => "ITR-4",
        }
    }
}

impl fmt::Display for ItrFormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ItrFormType {
    type Error = ParseItrFormError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ITR-1" => Ok(Self::Itr1),
            "ITR-2" => Ok(Self::Itr2),
            "ITR-3" => Ok(Self::Itr3),
            "ITR-4" => Ok(Self::Itr4),
            _ => Err(ParseItrFormError(value.to_owned())),
        }
    }
}

/// Postal address of the taxpayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Postal index number.
    pub pincode: Option<String>,
}

/// Identity details of the taxpayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Permanent account number.
    pub pan: Option<Pan>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Address,
}

/// Salary income components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryIncome {
    /// Basic salary.
    pub basic_salary: Decimal,
    /// Taxable allowances.
    pub allowances: Decimal,
    /// Perquisites.
    pub perquisites: Decimal,
    /// Profits in lieu of salary.
    pub profits_in_lieu: Decimal,
}

impl SalaryIncome {
    /// Salary income made of basic salary only.
    #[must_use]
    pub fn basic(amount: Decimal) -> Self {
        Self {
            basic_salary: amount,
            ..Self::default()
        }
    }

    /// Sum of all salary components.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::AmountTooLarge`] on overflow.
    pub fn total(&self) -> Result<Decimal, FilingDomainError> {
        let components = [
            self.basic_salary,
            self.allowances,
            self.perquisites,
            self.profits_in_lieu,
        ];
        Ok(tax::checked_total("salary income", components)?)
    }
}

/// Income from house property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousePropertyIncome {
    /// Annual value of the property.
    pub annual_value: Decimal,
    /// Interest paid on the housing loan.
    pub interest: Decimal,
}

impl HousePropertyIncome {
    /// Annual value less interest; may be negative.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.annual_value - self.interest
    }

    /// Portion that counts towards gross income: losses are ignored.
    #[must_use]
    pub fn taxable(&self) -> Decimal {
        self.net().max(Decimal::ZERO)
    }
}

/// Income from other sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherSourcesIncome {
    /// Interest income.
    pub interest: Decimal,
    /// Dividend income.
    pub dividend: Decimal,
    /// Anything else.
    pub other: Decimal,
}

impl OtherSourcesIncome {
    /// Sum of all other-source components.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::AmountTooLarge`] on overflow.
    pub fn total(&self) -> Result<Decimal, FilingDomainError> {
        let components = [self.interest, self.dividend, self.other];
        Ok(tax::checked_total("other sources income", components)?)
    }
}

/// Income breakdown of a return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Income {
    /// Salary components.
    pub salary: SalaryIncome,
    /// House property.
    pub house_property: HousePropertyIncome,
    /// Other sources.
    pub other_sources: OtherSourcesIncome,
}

impl Income {
    /// Income consisting of basic salary only.
    #[must_use]
    pub fn from_salary(amount: Decimal) -> Self {
        Self {
            salary: SalaryIncome::basic(amount),
            ..Self::default()
        }
    }

    /// Non-salary income amounts that count towards gross income.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::AmountTooLarge`] on overflow.
    pub fn other_source_amounts(&self) -> Result<[Decimal; 2], FilingDomainError> {
        Ok([self.house_property.taxable(), self.other_sources.total()?])
    }

    /// Gross total income.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::AmountTooLarge`] on overflow.
    pub fn total(&self) -> Result<Decimal, FilingDomainError> {
        let salary = self.salary.total()?;
        let others = self.other_source_amounts()?;
        Ok(tax::total_income(salary, &others)?)
    }

    fn validate(&self) -> Result<(), FilingDomainError> {
        let amounts = [
            ("basic salary", self.salary.basic_salary),
            ("allowances", self.salary.allowances),
            ("perquisites", self.salary.perquisites),
            ("profits in lieu of salary", self.salary.profits_in_lieu),
            ("house property annual value", self.house_property.annual_value),
            ("house property interest", self.house_property.interest),
            ("interest income", self.other_sources.interest),
            ("dividend income", self.other_sources.dividend),
            ("other income", self.other_sources.other),
        ];
        amounts
            .into_iter()
            .try_for_each(|(field, amount)| ensure_non_negative(field, amount))
    }
}

/// Deduction buckets claimed on a return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Section 80C investments.
    pub section_80c: Decimal,
    /// Section 80D health insurance.
    pub section_80d: Decimal,
    /// Section 80G donations.
    pub section_80g: Decimal,
    /// Section 24 housing-loan interest.
    pub section_24: Decimal,
}

impl Deductions {
    /// Bucket labels paired with amounts, in statutory order.
    #[must_use]
    pub fn named_buckets(&self) -> [(&'static str, Decimal); 4] {
        [
            ("80C", self.section_80c),
            ("80D", self.section_80d),
            ("80G", self.section_80g),
            ("Sec 24 (Home Loan)", self.section_24),
        ]
    }

    /// Bucket amounts in statutory order.
    #[must_use]
    pub fn buckets(&self) -> [Decimal; 4] {
        self.named_buckets().map(|(_, amount)| amount)
    }

    /// Sum of all buckets.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::AmountTooLarge`] on overflow.
    pub fn total(&self) -> Result<Decimal, FilingDomainError> {
        Ok(tax::total_deductions(&self.buckets())?)
    }

    fn validate(&self) -> Result<(), FilingDomainError> {
        self.named_buckets()
            .into_iter()
            .try_for_each(|(field, amount)| ensure_non_negative(field, amount))
    }
}

/// Tax already paid against this return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPaid {
    /// Tax deducted at source.
    pub tds: Decimal,
}

/// Last-computed tax snapshot; derived from the inputs, never authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxCalculation {
    /// Gross total income.
    pub gross_total_income: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Taxable income.
    pub taxable_income: Decimal,
    /// Bracket tax before prepayments.
    pub calculated_tax: Decimal,
    /// Tax still owed.
    pub tax_payable: Decimal,
    /// Tax already paid.
    pub tax_paid: Decimal,
    /// Excess prepayment to refund.
    pub refund: Decimal,
}

impl From<TaxAssessment> for TaxCalculation {
    fn from(value: TaxAssessment) -> Self {
        Self {
            gross_total_income: value.gross_total_income,
            total_deductions: value.total_deductions,
            taxable_income: value.taxable_income,
            calculated_tax: value.calculated_tax,
            tax_payable: value.tax_payable,
            tax_paid: value.tax_paid,
            refund: value.refund,
        }
    }
}

/// Complete set of taxpayer inputs for a new filing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingInputs {
    /// Return form.
    pub itr_form: ItrFormType,
    /// Identity details.
    pub personal_info: PersonalInfo,
    /// Income breakdown.
    pub income: Income,
    /// Deduction buckets.
    pub deductions: Deductions,
    /// Prepaid tax.
    pub tax_paid: TaxPaid,
    /// Regime for the filing's own tax snapshot.
    pub regime: Regime,
}

impl FilingInputs {
    /// Checks every monetary amount is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::NegativeAmount`] naming the first
    /// negative field.
    pub fn validate(&self) -> Result<(), FilingDomainError> {
        self.income.validate()?;
        self.deductions.validate()?;
        ensure_non_negative("tax paid", self.tax_paid.tds)
    }

    /// Builds tax engine inputs from these values.
    ///
    /// # Errors
    ///
    /// Returns [`FilingDomainError::AmountTooLarge`] when an income head
    /// overflows.
    pub fn to_tax_inputs(&self) -> Result<TaxInputs, FilingDomainError> {
        let with_income = self
            .income
            .other_source_amounts()?
            .into_iter()
            .fold(TaxInputs::new(self.income.salary.total()?), |inputs, amount| {
                inputs.with_other_income(amount)
            });
        Ok(self
            .deductions
            .buckets()
            .into_iter()
            .fold(with_income, |inputs, amount| inputs.with_deduction(amount))
            .with_tax_paid(self.tax_paid.tds)
            .with_regime(self.regime))
    }
}

/// Partial update to a filing's inputs; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingUpdate {
    /// Replacement return form.
    pub itr_form: Option<ItrFormType>,
    /// Replacement identity details.
    pub personal_info: Option<PersonalInfo>,
    /// Replacement income breakdown.
    pub income: Option<Income>,
    /// Replacement deduction buckets.
    pub deductions: Option<Deductions>,
    /// Replacement prepaid tax.
    pub tax_paid: Option<TaxPaid>,
    /// Replacement regime.
    pub regime: Option<Regime>,
}

impl FilingUpdate {
    /// Returns `inputs` with this update applied.
    #[must_use]
    pub fn apply_to(self, inputs: &FilingInputs) -> FilingInputs {
        FilingInputs {
            itr_form: self.itr_form.unwrap_or(inputs.itr_form),
            personal_info: self
                .personal_info
                .unwrap_or_else(|| inputs.personal_info.clone()),
            income: self.income.unwrap_or(inputs.income),
            deductions: self.deductions.unwrap_or(inputs.deductions),
            tax_paid: self.tax_paid.unwrap_or(inputs.tax_paid),
            regime: self.regime.unwrap_or(inputs.regime),
        }
    }
}

fn ensure_non_negative(field: &'static str, amount: Decimal) -> Result<(), FilingDomainError> {
    if amount < Decimal::ZERO {
        return Err(FilingDomainError::NegativeAmount { field });
    }
    Ok(())
}
