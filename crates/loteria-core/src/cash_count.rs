//! # Cash Count Engine
//!
//! Turns banknote and coin quantities into exact monetary totals and builds
//! the payload the count form submits.
//!
//! ## Count Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cash Box Count                                   │
//! │                                                                         │
//! │  DenominationTable (fixed, closed)                                     │
//! │   notes: 200 100 50 20 10 5 2      coins: 1 0.50 0.25 0.10 0.05       │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  DenominationSet  ◄── set_raw / increment / decrement (every keystroke)│
//! │          │                                                              │
//! │          ├──────────► compute_totals() ──► CountTotals (live summary)  │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  CashCountRequest::new(set, caixaId, date, today)                      │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  { "caixaId", "dataContagem", "notas200", …, "moedas005" } → API       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is in integer centavos; the totals of a set are exact no
//! matter how many sub-real coins are added.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::validation::{validate_not_future, validate_quantity, validate_required, Quantity};

// =============================================================================
// Denomination
// =============================================================================

/// Whether a denomination is a banknote or a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominationKind {
    Note,
    Coin,
}

impl DenominationKind {
    /// Prefix of the payload field names for this kind.
    pub const fn field_prefix(&self) -> &'static str {
        match self {
            DenominationKind::Note => "notas",
            DenominationKind::Coin => "moedas",
        }
    }
}

/// A single banknote or coin face value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Denomination {
    label: String,
    face_value: Money,
    kind: DenominationKind,
}

impl Denomination {
    /// Creates a denomination with an explicit face value.
    ///
    /// The face value must be strictly positive.
    pub fn new(label: impl Into<String>, face_value: Money, kind: DenominationKind) -> CoreResult<Self> {
        let label = label.into();
        if !face_value.is_positive() {
            return Err(CoreError::InvalidFaceValue { label });
        }

        Ok(Denomination {
            label,
            face_value,
            kind,
        })
    }

    /// Creates a denomination whose face value is written in its label.
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::cash_count::{Denomination, DenominationKind};
    ///
    /// let coin = Denomination::parse("0.25", DenominationKind::Coin).unwrap();
    /// assert_eq!(coin.face_value().cents(), 25);
    /// assert_eq!(coin.field_name(), "moedas025");
    /// ```
    pub fn parse(label: &str, kind: DenominationKind) -> CoreResult<Self> {
        let face_value = Money::parse_decimal(label)?;
        Denomination::new(label.trim(), face_value, kind)
    }

    const fn standard(label: &'static str, cents: i64, kind: DenominationKind) -> StandardEntry {
        StandardEntry { label, cents, kind }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn face_value(&self) -> Money {
        self.face_value
    }

    pub fn kind(&self) -> DenominationKind {
        self.kind
    }

    /// Name of this denomination's field in the submission payload.
    ///
    /// Kind prefix plus the label without its decimal separator:
    /// `"200"` → `notas200`, `"0.50"` → `moedas050`, `"1"` → `moedas1`.
    pub fn field_name(&self) -> String {
        let digits: String = self.label.chars().filter(|c| c.is_ascii_digit()).collect();
        format!("{}{}", self.kind.field_prefix(), digits)
    }
}

struct StandardEntry {
    label: &'static str,
    cents: i64,
    kind: DenominationKind,
}

/// The Brazilian real table used by the count form.
const BRL_TABLE: [StandardEntry; 12] = [
    Denomination::standard("200", 20000, DenominationKind::Note),
    Denomination::standard("100", 10000, DenominationKind::Note),
    Denomination::standard("50", 5000, DenominationKind::Note),
    Denomination::standard("20", 2000, DenominationKind::Note),
    Denomination::standard("10", 1000, DenominationKind::Note),
    Denomination::standard("5", 500, DenominationKind::Note),
    Denomination::standard("2", 200, DenominationKind::Note),
    Denomination::standard("1", 100, DenominationKind::Coin),
    Denomination::standard("0.50", 50, DenominationKind::Coin),
    Denomination::standard("0.25", 25, DenominationKind::Coin),
    Denomination::standard("0.10", 10, DenominationKind::Coin),
    Denomination::standard("0.05", 5, DenominationKind::Coin),
];

// =============================================================================
// Denomination Table
// =============================================================================

/// An ordered, closed list of denominations.
///
/// ## Invariants
/// - Labels are unique
/// - Payload field names are unique
/// - Face values are strictly positive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationTable {
    denominations: Vec<Denomination>,
}

impl DenominationTable {
    /// Builds a table, rejecting duplicate labels or field names.
    pub fn new(denominations: Vec<Denomination>) -> CoreResult<Self> {
        let mut labels = BTreeSet::new();
        let mut fields = BTreeSet::new();
        for denomination in &denominations {
            if !labels.insert(denomination.label.clone()) || !fields.insert(denomination.field_name()) {
                return Err(CoreError::DuplicateDenomination(denomination.label.clone()));
            }
        }

        Ok(DenominationTable { denominations })
    }

    /// Builds a table from note and coin labels, in that order.
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::cash_count::DenominationTable;
    ///
    /// let table = DenominationTable::from_labels(&["100", "50"], &["1", "0.01"]).unwrap();
    /// assert_eq!(table.len(), 4);
    /// ```
    pub fn from_labels(notes: &[&str], coins: &[&str]) -> CoreResult<Self> {
        let denominations = notes
            .iter()
            .map(|label| Denomination::parse(label, DenominationKind::Note))
            .chain(
                coins
                    .iter()
                    .map(|label| Denomination::parse(label, DenominationKind::Coin)),
            )
            .collect::<CoreResult<Vec<_>>>()?;

        DenominationTable::new(denominations)
    }

    /// The standard Brazilian real table: 7 notes and 5 coins.
    pub fn brl() -> Self {
        DenominationTable {
            denominations: BRL_TABLE
                .iter()
                .map(|entry| Denomination {
                    label: entry.label.to_string(),
                    face_value: Money::from_cents(entry.cents),
                    kind: entry.kind,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.denominations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Denomination> {
        self.denominations.iter()
    }

    /// Looks up a denomination by label.
    pub fn get(&self, label: &str) -> Option<&Denomination> {
        self.position(label).map(|i| &self.denominations[i])
    }

    fn position(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.denominations.iter().position(|d| d.label == label)
    }

    fn position_of_field(&self, field: &str) -> Option<usize> {
        self.denominations.iter().position(|d| d.field_name() == field)
    }
}

impl Default for DenominationTable {
    fn default() -> Self {
        DenominationTable::brl()
    }
}

// =============================================================================
// Quantity Helpers
// =============================================================================

/// The "+" button: one more note or coin.
///
/// No upper bound; saturates at [`Quantity::MAX`] instead of wrapping.
#[inline]
pub const fn increment(quantity: Quantity) -> Quantity {
    quantity.saturating_add(1)
}

/// The "−" button: one fewer, never below zero.
#[inline]
pub const fn decrement(quantity: Quantity) -> Quantity {
    quantity.saturating_sub(1)
}

// =============================================================================
// Denomination Set
// =============================================================================

/// A table plus one quantity per denomination.
///
/// ## Example
/// ```rust
/// use loteria_core::cash_count::{DenominationSet, DenominationTable};
///
/// let mut set = DenominationSet::new(DenominationTable::brl());
/// set.increment("200").unwrap();
/// set.set_raw("0.05", "3").unwrap();
/// assert_eq!(set.quantity("200").unwrap(), 1);
///
/// // Invalid text leaves the quantity untouched
/// assert!(set.set_raw("0.05", "x").is_err());
/// assert_eq!(set.quantity("0.05").unwrap(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationSet {
    table: DenominationTable,
    quantities: Vec<Quantity>,
}

impl DenominationSet {
    /// Creates a set with every quantity at zero.
    pub fn new(table: DenominationTable) -> Self {
        let quantities = vec![0; table.len()];
        DenominationSet { table, quantities }
    }

    /// Creates a set from `(label, quantity)` pairs; missing labels are zero.
    pub fn with_quantities<'a, I>(table: DenominationTable, pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (&'a str, Quantity)>,
    {
        let mut set = DenominationSet::new(table);
        for (label, quantity) in pairs {
            set.set(label, quantity)?;
        }
        Ok(set)
    }

    pub fn table(&self) -> &DenominationTable {
        &self.table
    }

    fn index(&self, label: &str) -> CoreResult<usize> {
        self.table
            .position(label)
            .ok_or_else(|| CoreError::UnknownDenomination(label.to_string()))
    }

    /// Current quantity of a denomination.
    pub fn quantity(&self, label: &str) -> CoreResult<Quantity> {
        Ok(self.quantities[self.index(label)?])
    }

    /// Sets a quantity.
    pub fn set(&mut self, label: &str, quantity: Quantity) -> CoreResult<()> {
        let i = self.index(label)?;
        self.quantities[i] = quantity;
        Ok(())
    }

    /// Sets a quantity from field text, returning the stored value.
    ///
    /// On error the previous quantity is kept.
    pub fn set_raw(&mut self, label: &str, raw: &str) -> CoreResult<Quantity> {
        let i = self.index(label)?;
        let quantity = validate_quantity(raw)?;
        self.quantities[i] = quantity;
        Ok(quantity)
    }

    /// Adds one to a denomination, returning the new quantity.
    pub fn increment(&mut self, label: &str) -> CoreResult<Quantity> {
        let i = self.index(label)?;
        self.quantities[i] = increment(self.quantities[i]);
        Ok(self.quantities[i])
    }

    /// Removes one from a denomination (floored at zero), returning the new quantity.
    pub fn decrement(&mut self, label: &str) -> CoreResult<Quantity> {
        let i = self.index(label)?;
        self.quantities[i] = decrement(self.quantities[i]);
        Ok(self.quantities[i])
    }

    /// Sets every quantity back to zero.
    pub fn reset(&mut self) {
        self.quantities.iter_mut().for_each(|q| *q = 0);
    }

    /// True when nothing has been counted.
    pub fn is_zero(&self) -> bool {
        self.quantities.iter().all(|&q| q == 0)
    }

    /// Denominations with their quantities, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&Denomination, Quantity)> + '_ {
        self.table.iter().zip(self.quantities.iter().copied())
    }

    /// Per-denomination subtotal (`quantity × face value`), in table order.
    pub fn subtotals(&self) -> impl Iterator<Item = (&Denomination, Quantity, Money)> + '_ {
        self.iter().map(|(denomination, quantity)| {
            (
                denomination,
                quantity,
                denomination.face_value.saturating_mul_count(u64::from(quantity)),
            )
        })
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived totals of a count. Never stored on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTotals {
    #[serde(rename = "totalNotas", with = "money::as_decimal")]
    pub total_notes: Money,
    #[serde(rename = "totalMoedas", with = "money::as_decimal")]
    pub total_coins: Money,
    #[serde(rename = "totalGeral", with = "money::as_decimal")]
    pub grand_total: Money,
}

impl CountTotals {
    /// Total of one kind.
    pub fn subtotal(&self, kind: DenominationKind) -> Money {
        match kind {
            DenominationKind::Note => self.total_notes,
            DenominationKind::Coin => self.total_coins,
        }
    }
}

/// Sums a count into note, coin and grand totals.
///
/// ## Guarantees
/// - Exact: integer centavo accumulation, no floating point
/// - Order independent: the result depends only on (denomination, quantity) pairs
/// - `grand_total == total_notes + total_coins` by construction
/// - Saturates at the Money range instead of overflowing
///
/// ## Example
/// ```rust
/// use loteria_core::cash_count::{compute_totals, DenominationSet, DenominationTable};
///
/// let set = DenominationSet::with_quantities(
///     DenominationTable::brl(),
///     [("200", 1), ("1", 3), ("0.50", 2), ("0.05", 1)],
/// ).unwrap();
///
/// let totals = compute_totals(&set);
/// assert_eq!(totals.total_notes.cents(), 20000);
/// assert_eq!(totals.total_coins.cents(), 405);
/// assert_eq!(totals.grand_total.to_string(), "R$ 204,05");
/// ```
pub fn compute_totals(set: &DenominationSet) -> CountTotals {
    let (total_notes, total_coins) = set.subtotals().fold(
        (Money::zero(), Money::zero()),
        |(notes, coins), (denomination, _, subtotal)| match denomination.kind {
            DenominationKind::Note => (notes.saturating_add(subtotal), coins),
            DenominationKind::Coin => (notes, coins.saturating_add(subtotal)),
        },
    );

    CountTotals {
        total_notes,
        total_coins,
        grand_total: total_notes.saturating_add(total_coins),
    }
}

// =============================================================================
// Submission Payload
// =============================================================================

/// Validated body of `POST /contagem-caixa`.
///
/// Serializes as one flat object: `caixaId`, `dataContagem` (ISO-8601 date)
/// and one integer field per denomination in table order. It is always sent
/// whole; there is no partial submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashCountRequest {
    box_id: String,
    count_date: NaiveDate,
    quantities: Vec<(String, Quantity)>,
}

impl CashCountRequest {
    /// Builds the payload for a count.
    ///
    /// ## Rules
    /// - `box_id` must not be blank ("Selecione uma caixa")
    /// - `count_date` must not be after `today`
    pub fn new(
        set: &DenominationSet,
        box_id: &str,
        count_date: NaiveDate,
        today: NaiveDate,
    ) -> CoreResult<Self> {
        let box_id = validate_required("caixaId", box_id)?;
        validate_not_future("dataContagem", count_date, today)?;

        Ok(CashCountRequest {
            box_id,
            count_date,
            quantities: set
                .iter()
                .map(|(denomination, quantity)| (denomination.field_name(), quantity))
                .collect(),
        })
    }

    pub fn box_id(&self) -> &str {
        &self.box_id
    }

    pub fn count_date(&self) -> NaiveDate {
        self.count_date
    }

    /// Payload fields with their quantities.
    pub fn quantities(&self) -> &[(String, Quantity)] {
        &self.quantities
    }

    /// Quantity of one payload field (`"notas200"`).
    pub fn quantity(&self, field: &str) -> Option<Quantity> {
        self.quantities
            .iter()
            .find(|(name, _)| name == field)
            .map(|&(_, quantity)| quantity)
    }

    /// Rebuilds the form state from a payload (edit flow).
    ///
    /// Fields the table does not know are rejected; fields the payload lacks
    /// are zero.
    pub fn to_set(&self, table: &DenominationTable) -> CoreResult<DenominationSet> {
        let mut set = DenominationSet::new(table.clone());
        for (field, quantity) in &self.quantities {
            let i = table
                .position_of_field(field)
                .ok_or_else(|| CoreError::UnknownDenomination(field.clone()))?;
            set.quantities[i] = *quantity;
        }
        Ok(set)
    }
}

impl Serialize for CashCountRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.quantities.len() + 2))?;
        map.serialize_entry("caixaId", &self.box_id)?;
        map.serialize_entry("dataContagem", &self.count_date)?;
        for (field, quantity) in &self.quantities {
            map.serialize_entry(field, quantity)?;
        }
        map.end()
    }
}

/// Denomination fields keep the order they arrive in.
impl<'de> Deserialize<'de> for CashCountRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = CashCountRequest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a cash count object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut box_id: Option<String> = None;
                let mut count_date: Option<NaiveDate> = None;
                let mut quantities: Vec<(String, Quantity)> = Vec::new();

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "caixaId" => box_id = Some(map.next_value()?),
                        "dataContagem" => count_date = Some(map.next_value()?),
                        _ => {
                            if quantities.iter().any(|(field, _)| *field == key) {
                                return Err(A::Error::custom(format!("duplicate field `{}`", key)));
                            }
                            let quantity = map.next_value()?;
                            quantities.push((key, quantity));
                        }
                    }
                }

                let box_id = box_id.ok_or_else(|| A::Error::missing_field("caixaId"))?;
                if box_id.trim().is_empty() {
                    return Err(A::Error::custom("caixaId is required"));
                }
                let count_date = count_date.ok_or_else(|| A::Error::missing_field("dataContagem"))?;

                Ok(CashCountRequest {
                    box_id,
                    count_date,
                    quantities,
                })
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
