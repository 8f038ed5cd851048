//! Exact decimal types for prices and tax rates.
//!
//! SQLite has no exact decimal column type, so the values here are stored as
//! scaled integers: unit prices in cents and tax rates in whole percent.
//! Both types hold at most two fractional digits, which keeps the conversion
//! lossless in both directions.

use std::fmt::Display;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{Error, report::CalculationError};

/// The number of fractional digits that reported amounts are rounded to.
pub const REPORTED_DECIMAL_PLACES: u32 = 2;

/// The scale of an invoice row amount stored as an integer.
///
/// Cents (scale 2) multiplied by a percent factor (scale 2).
pub(crate) const AMOUNT_SCALE: u32 = 4;

/// The largest total that fits in a 64-bit integer at [AMOUNT_SCALE].
pub(crate) const MAX_AMOUNT: Decimal =
    Decimal::from_parts(u32::MAX, i32::MAX as u32, 0, false, AMOUNT_SCALE);

/// The largest value accepted for prices and tax rates, in hundredths.
const MAX_FIELD_HUNDREDTHS: i64 = 9999;

/// Round `value` to [REPORTED_DECIMAL_PLACES] using round-half-to-even.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(REPORTED_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Format `value` rounded to exactly two fractional digits, e.g. "12.50".
pub fn format_money(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(REPORTED_DECIMAL_PLACES);

    rounded.to_string()
}

/// Add up non-negative amounts.
///
/// # Errors
/// Returns [CalculationError::AmountOverflow] if the total exceeds [MAX_AMOUNT].
pub(crate) fn sum_amounts(
    amounts: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, CalculationError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| {
            total
                .checked_add(amount)
                .filter(|total| *total <= MAX_AMOUNT)
        })
        .ok_or(CalculationError::AmountOverflow)
}

/// Convert an amount stored at [AMOUNT_SCALE] back into a decimal.
pub(crate) fn amount_from_scaled(value: i64) -> Decimal {
    Decimal::new(value, AMOUNT_SCALE)
}

/// Convert whole cents back into a decimal.
pub(crate) fn amount_from_cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

/// `value` in hundredths, if it is in `0.00..=99.99` with at most two
/// decimal places.
fn to_hundredths(value: Decimal) -> Option<i64> {
    if value.round_dp(2) != value {
        return None;
    }

    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|hundredths| hundredths.to_i64())
        .filter(|hundredths| (0..=MAX_FIELD_HUNDREDTHS).contains(hundredths))
}

/// A tax rate expressed as a fraction, e.g. 0.20 for 20%.
///
/// The rate is held in whole percent, the form it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxRate(i64);

impl TaxRate {
    /// The tax rate of a row that defers to its invoice's default rate.
    pub const ZERO: TaxRate = TaxRate(0);

    /// The default tax rate of a new invoice.
    pub const DEFAULT_INVOICE_RATE: TaxRate = TaxRate(20);

    /// Create a tax rate.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTaxRate] if `rate` is negative, larger than
    /// 99.99 or has more than two decimal places.
    pub fn new(rate: Decimal) -> Result<Self, Error> {
        to_hundredths(rate)
            .map(Self)
            .ok_or(Error::InvalidTaxRate(rate))
    }

    /// Create a tax rate from whole percent, e.g. 20 for 0.20.
    ///
    /// `percent` must already be in `0..=9999`, as it is in a stored row.
    pub(crate) fn from_percent(percent: i64) -> Self {
        Self(percent)
    }

    /// The tax rate in whole percent, the form it is stored in.
    pub fn as_percent(&self) -> i64 {
        self.0
    }

    /// Whether the rate is zero, meaning a row should use its invoice's rate.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The rate as a decimal fraction.
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

/// The price of a single unit on an invoice row.
///
/// The price is held in cents, the form it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitPrice(i64);

impl UnitPrice {
    /// Create a unit price.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUnitPrice] if `price` is negative, larger than
    /// 99.99 or has more than two decimal places.
    pub fn new(price: Decimal) -> Result<Self, Error> {
        to_hundredths(price)
            .map(Self)
            .ok_or(Error::InvalidUnitPrice(price))
    }

    /// Create a unit price from cents.
    ///
    /// `cents` must already be in `0..=9999`, as it is in a stored row.
    pub(crate) fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The price in cents, the form it is stored in.
    pub fn as_cents(&self) -> i64 {
        self.0
    }

    /// The price as a decimal.
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl Display for UnitPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}


#[cfg(test)]
mod unit_price_tests {
    use rust_decimal_macros::dec;

    use crate::{Error, money::UnitPrice};

    #[test]
    fn cents_round_trip() {
        let price = UnitPrice::new(dec!(0.2)).expect("Could not create unit price");

        assert_eq!(price.as_cents(), 20);
        assert_eq!(UnitPrice::from_cents(20), price);
    }

    #[test]
    fn new_fails_on_fractional_cents() {
        assert_eq!(
            UnitPrice::new(dec!(4.999)),
            Err(Error::InvalidUnitPrice(dec!(4.999)))
        );
    }

    #[test]
    fn new_ignores_trailing_zeros() {
        assert_eq!(
            UnitPrice::new(dec!(5)).unwrap(),
            UnitPrice::new(dec!(5.00)).unwrap()
        );
        assert_eq!(UnitPrice::new(dec!(5)).unwrap().as_cents(), 500);
    }

    #[test]
    fn new_fails_on_negative_and_too_large_prices() {
        assert_eq!(
            UnitPrice::new(dec!(-0.01)),
            Err(Error::InvalidUnitPrice(dec!(-0.01)))
        );
        assert_eq!(
            UnitPrice::new(dec!(100.00)),
            Err(Error::InvalidUnitPrice(dec!(100.00)))
        );
    }
}

#[cfg(test)]
mod sum_amounts_tests {
    use rust_decimal_macros::dec;

    use crate::{
        money::{MAX_AMOUNT, sum_amounts},
        report::CalculationError,
    };

    #[test]
    fn sums_amounts() {
        assert_eq!(sum_amounts([dec!(12), dec!(0.0125)]), Ok(dec!(12.0125)));
        assert_eq!(sum_amounts([]), Ok(dec!(0)));
    }

    #[test]
    fn largest_amount_is_i64_max_at_scale_4() {
        assert_eq!(MAX_AMOUNT, dec!(922337203685477.5807));
        assert_eq!(sum_amounts([MAX_AMOUNT]), Ok(MAX_AMOUNT));
    }

    #[test]
    fn fails_when_total_exceeds_largest_amount() {
        assert_eq!(
            sum_amounts([MAX_AMOUNT, dec!(0.0001)]),
            Err(CalculationError::AmountOverflow)
        );
    }
}
