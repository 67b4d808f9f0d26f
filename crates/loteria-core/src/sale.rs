//! # Sale Entry
//!
//! State of the "Nova Venda" form and the request it submits.
//!
//! ```text
//! SaleDraft { caixa, jogo, quantidade ≥ 1, data, cliente? }
//!      │
//!      ├── total(preco) ──► preco × quantidade   (summary card)
//!      │
//!      └── validate(today) ──► SaleRequest ──► POST /vendas-caixa
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{
    validate_not_future, validate_positive_quantity, validate_quantity, validate_required, Quantity,
};

/// Body of `POST /vendas-caixa`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    #[serde(rename = "caixaId")]
    pub box_id: String,
    #[serde(rename = "jogoId")]
    pub game_id: String,
    #[serde(rename = "quantidade")]
    pub quantity: Quantity,
    #[serde(rename = "dataVenda")]
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    #[serde(rename = "clienteId", skip_serializing_if = "Option::is_none", default)]
    pub client_id: Option<String>,
}

/// The sale form while it is being filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub box_id: String,
    pub game_id: String,
    pub quantity: Quantity,
    pub sale_date: NaiveDate,
    pub client_id: Option<String>,
}

impl SaleDraft {
    /// A blank form dated `today`, quantity 1.
    pub fn new(today: NaiveDate) -> Self {
        SaleDraft {
            box_id: String::new(),
            game_id: String::new(),
            quantity: 1,
            sale_date: today,
            client_id: None,
        }
    }

    pub fn increment(&mut self) -> Quantity {
        self.quantity = self.quantity.saturating_add(1);
        self.quantity
    }

    /// The "−" button. A sale never goes below one ticket.
    pub fn decrement(&mut self) -> Quantity {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
        self.quantity
    }

    /// Sets the quantity from field text; on error the old value stays.
    pub fn set_quantity_raw(&mut self, raw: &str) -> CoreResult<Quantity> {
        let quantity = validate_quantity(raw)?;
        validate_positive_quantity("quantidade", quantity)?;
        self.quantity = quantity;
        Ok(quantity)
    }

    /// Amount the summary card shows: `unit_price × quantity`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use loteria_core::money::Money;
    /// use loteria_core::sale::SaleDraft;
    ///
    /// let mut draft = SaleDraft::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    /// draft.quantity = 3;
    /// assert_eq!(draft.total(Money::from_cents(550)).cents(), 1650);
    /// ```
    pub fn total(&self, unit_price: Money) -> Money {
        unit_price.saturating_mul_count(u64::from(self.quantity))
    }

    /// Checks the form and builds the request.
    ///
    /// ## Rules
    /// - Box and game must be selected
    /// - Quantity must be positive
    /// - Sale date must not be after `today`
    /// - A blank client id is treated as no client
    pub fn validate(&self, today: NaiveDate) -> CoreResult<SaleRequest> {
        let box_id = validate_required("caixaId", &self.box_id)?;
        let game_id = validate_required("jogoId", &self.game_id)?;
        validate_positive_quantity("quantidade", self.quantity)?;
        validate_not_future("dataVenda", self.sale_date, today)?;

        let client_id = self
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(SaleRequest {
            box_id,
            game_id,
            quantity: self.quantity,
            sale_date: self.sale_date,
            client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn filled() -> SaleDraft {
        SaleDraft {
            box_id: "caixa-1".to_string(),
            game_id: "jogo-9".to_string(),
            ..SaleDraft::new(today())
        }
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = SaleDraft::new(today());
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.sale_date, today());
        assert!(draft.client_id.is_none());
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut draft = filled();
        assert_eq!(draft.decrement(), 1);
        assert_eq!(draft.increment(), 2);
        assert_eq!(draft.increment(), 3);
        assert_eq!(draft.decrement(), 2);
        assert_eq!(draft.decrement(), 1);
        assert_eq!(draft.decrement(), 1);
    }

    #[test]
    fn test_set_quantity_raw() {
        let mut draft = filled();
        assert_eq!(draft.set_quantity_raw("4").unwrap(), 4);
        assert!(draft.set_quantity_raw("0").is_err());
        assert!(draft.set_quantity_raw("dois").is_err());
        assert_eq!(draft.quantity, 4);
    }

    #[test]
    fn test_total() {
        let mut draft = filled();
        draft.quantity = 10;
        assert_eq!(draft.total(Money::from_cents(250)), Money::from_cents(2500));
        assert_eq!(draft.total(Money::zero()), Money::zero());
    }

    #[test]
    fn test_validate_requires_selection() {
        let draft = SaleDraft::new(today());
        assert_eq!(
            draft.validate(today()),
            Err(CoreError::Validation(ValidationError::Required {
                field: "caixaId".to_string()
            }))
        );

        let draft = SaleDraft {
            box_id: "c".to_string(),
            ..SaleDraft::new(today())
        };
        assert!(matches!(
            draft.validate(today()),
            Err(CoreError::Validation(ValidationError::Required { field })) if field == "jogoId"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_and_future() {
        let mut draft = filled();
        draft.quantity = 0;
        assert!(matches!(
            draft.validate(today()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let mut draft = filled();
        draft.sale_date = today().succ_opt().unwrap();
        assert!(matches!(
            draft.validate(today()),
            Err(CoreError::Validation(ValidationError::InFuture { .. }))
        ));
    }

    #[test]
    fn test_request_json() {
        let mut draft = filled();
        draft.client_id = Some("  ".to_string());
        let request = draft.validate(today()).unwrap();
        assert!(request.client_id.is_none());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "caixaId": "caixa-1",
                "jogoId": "jogo-9",
                "quantidade": 1,
                "dataVenda": "2024-05-10"
            })
        );
    }
}
