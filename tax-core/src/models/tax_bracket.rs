use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income range taxed at a single marginal rate.
///
/// `max_income` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.max_income.is_none()
    }

    /// Portion of `taxable_income` that falls inside this bracket.
    ///
    /// Zero unless `taxable_income` is strictly above `min_income`.
    pub fn income_in_bracket(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= self.min_income {
            return Decimal::ZERO;
        }

        let upper = match self.max_income {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        upper - self.min_income
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn income_in_bracket_is_zero_at_min() {
        let bracket = TaxBracket::new(dec!(11001), Some(dec!(44725)), dec!(0.12));

        assert_eq!(bracket.income_in_bracket(dec!(11001)), dec!(0));
    }

    #[test]
    fn income_in_bracket_caps_at_max() {
        let bracket = TaxBracket::new(dec!(11001), Some(dec!(44725)), dec!(0.12));

        assert_eq!(bracket.income_in_bracket(dec!(90000)), dec!(33724));
    }

    #[test]
    fn income_in_bracket_partial() {
        let bracket = TaxBracket::new(dec!(44726), Some(dec!(95375)), dec!(0.22));

        assert_eq!(bracket.income_in_bracket(dec!(86150)), dec!(41424));
    }

    #[test]
    fn income_in_open_bracket_is_unbounded() {
        let bracket = TaxBracket::new(dec!(578126), None, dec!(0.37));

        assert!(bracket.is_open_ended());
        assert_eq!(bracket.income_in_bracket(dec!(1000000)), dec!(421874));
    }
}
