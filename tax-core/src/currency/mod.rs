//! Locale-aware currency formatting.
//!
//! Each supported currency maps to one locale (USD → en-US, EUR → de-DE, …)
//! that fixes symbol placement, digit grouping and separators. Unmapped
//! currencies use US-English conventions with the currency code as symbol.
//!
//! Separators are plain ASCII spaces where a locale uses a space.

mod locale;

use rust_decimal::Decimal;
use rusty_money::{Formatter, Money, Round, iso};

pub use locale::{LocaleFormat, locale_for};

/// Minor digits for codes that are not ISO-4217 currencies.
const DEFAULT_EXPONENT: u32 = 2;

/// Formats `amount` in `currency` using that currency's locale conventions.
///
/// The amount is rounded half away from zero to the currency's minor units.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::currency::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.56), "USD"), "$1,234.56");
/// assert_eq!(format_currency(dec!(1234.56), "GBP"), "£1,234.56");
/// assert_eq!(format_currency(dec!(1234.56), "EUR"), "1.234,56 €");
/// ```
pub fn format_currency(
    amount: Decimal,
    currency: &str,
) -> String {
    if let Some(format) = locale_for(currency) {
        let exponent = format.params.rounding.unwrap_or(format.currency.exponent);
        let money = rounded(amount, format.currency, exponent);
        return Formatter::money(&money, format.params.clone());
    }

    let code = currency.trim().to_uppercase();
    // Any currency will do as the carrier; only the amount is formatted.
    let carrier = iso::find(&code);
    let exponent = carrier.map_or(DEFAULT_EXPONENT, |c| c.exponent);
    let money = rounded(amount, carrier.unwrap_or(iso::USD), exponent);

    let magnitude = Money::from_decimal(money.amount().abs(), money.currency());
    let number = Formatter::money(&magnitude, locale::fallback_params(exponent));
    let sign = if money.is_negative() { "-" } else { "" };
    format!("{sign}{code} {number}")
}

/// Rounds half away from zero and pads to exactly `exponent` minor digits.
fn rounded(
    amount: Decimal,
    currency: &'static iso::Currency,
    exponent: u32,
) -> Money<'static, iso::Currency> {
    let mut value = *Money::from_decimal(amount, currency)
        .round(exponent, Round::HalfUp)
        .amount();
    value.rescale(exponent);
    Money::from_decimal(value, currency)
}
