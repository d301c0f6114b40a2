use std::iter;
use std::sync::LazyLock;

use rusty_money::iso;
use rusty_money::{Params, Position};

/// Separators needed to group the integer part of any [`rust_decimal::Decimal`].
const THOUSANDS_GROUPS: usize = 9;
const LAKH_GROUPS: usize = 13;

/// How one currency is written in the locale that formats it.
#[derive(Debug, Clone)]
pub struct LocaleFormat {
    /// BCP 47 tag, e.g. `de-DE`.
    pub tag: &'static str,
    /// ISO-4217 currency; its exponent gives the minor digits shown.
    pub currency: &'static iso::Currency,
    pub params: Params,
}

fn thousands() -> Vec<usize> {
    vec![3; THOUSANDS_GROUPS]
}

/// Last three digits, then groups of two: `12,34,567`.
fn lakh() -> Vec<usize> {
    iter::once(3).chain(iter::repeat_n(2, LAKH_GROUPS)).collect()
}

fn western(
    tag: &'static str,
    currency: &'static iso::Currency,
    symbol: &'static str,
) -> LocaleFormat {
    LocaleFormat {
        tag,
        currency,
        params: Params {
            digit_separator: ',',
            exponent_separator: '.',
            separator_pattern: thousands(),
            positions: vec![Position::Sign, Position::Symbol, Position::Amount],
            rounding: Some(currency.exponent),
            symbol: Some(symbol),
            code: Some(currency.iso_alpha_code),
        },
    }
}

/// `.` grouping and `,` decimals, with a space between symbol and amount.
fn continental(
    tag: &'static str,
    currency: &'static iso::Currency,
    symbol: &'static str,
    symbol_first: bool,
) -> LocaleFormat {
    let mut format = western(tag, currency, symbol);
    format.params.digit_separator = '.';
    format.params.exponent_separator = ',';
    format.params.positions = spaced(symbol_first);
    format
}

fn trailing(
    tag: &'static str,
    currency: &'static iso::Currency,
    symbol: &'static str,
) -> LocaleFormat {
    let mut format = western(tag, currency, symbol);
    format.params.positions = spaced(false);
    format
}

fn spaced(symbol_first: bool) -> Vec<Position> {
    if symbol_first {
        vec![Position::Sign, Position::Symbol, Position::Space, Position::Amount]
    } else {
        vec![Position::Sign, Position::Amount, Position::Space, Position::Symbol]
    }
}

/// Currency code to the locale whose conventions format it.
static LOCALES: LazyLock<Vec<LocaleFormat>> = LazyLock::new(|| {
    let mut inr = western("en-IN", iso::INR, "₹");
    inr.params.separator_pattern = lakh();

    let mut zar = continental("en-ZA", iso::ZAR, "R", true);
    zar.params.digit_separator = ' ';

    vec![
        western("en-US", iso::USD, "$"),
        western("en-GB", iso::GBP, "£"),
        continental("de-DE", iso::EUR, "€", false),
        western("en-CA", iso::CAD, "$"),
        western("es-MX", iso::MXN, "$"),
        western("ja-JP", iso::JPY, "￥"),
        western("zh-CN", iso::CNY, "¥"),
        inr,
        western("en-SG", iso::SGD, "$"),
        western("en-AU", iso::AUD, "$"),
        western("en-NZ", iso::NZD, "$"),
        continental("pt-BR", iso::BRL, "R$", true),
        continental("es-AR", iso::ARS, "$", true),
        zar,
        western("en-NG", iso::NGN, "₦"),
        trailing("ar-AE", iso::AED, "د.إ."),
        trailing("ar-SA", iso::SAR, "ر.س."),
        trailing("he-IL", iso::ILS, "₪"),
    ]
});

/// Locale conventions for `currency`, if it is one of the mapped currencies.
pub fn locale_for(currency: &str) -> Option<&'static LocaleFormat> {
    LOCALES
        .iter()
        .find(|format| format.currency.iso_alpha_code.eq_ignore_ascii_case(currency))
}

/// US-English amount formatting for unmapped currencies. The caller places
/// the currency code.
pub(super) fn fallback_params(exponent: u32) -> Params {
    Params {
        positions: vec![Position::Amount],
        separator_pattern: thousands(),
        rounding: Some(exponent),
        ..Params::default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_currency_maps_once() {
        let mut codes: Vec<_> = LOCALES
            .iter()
            .map(|format| format.currency.iso_alpha_code)
            .collect();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), 18);
    }

    #[test]
    fn locale_for_known_currency() {
        let format = locale_for("eur").unwrap();

        assert_eq!(format.tag, "de-DE");
        assert_eq!(format.params.digit_separator, '.');
        assert_eq!(format.params.exponent_separator, ',');
    }

    #[test]
    fn locale_for_unknown_currency() {
        assert!(locale_for("XYZ").is_none());
    }

    #[test]
    fn minor_digits_follow_iso_exponent() {
        assert_eq!(locale_for("USD").unwrap().params.rounding, Some(2));
        assert_eq!(locale_for("JPY").unwrap().params.rounding, Some(0));
    }

    #[test]
    fn lakh_pattern_covers_largest_decimal() {
        let digits: usize = lakh().iter().sum();
        assert!(digits >= 29);
        assert!(thousands().iter().sum::<usize>() >= 27);
    }
}
