use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CountryTaxRules;

/// Ways a rule set can violate the bracket and rate invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("rule set has no brackets")]
    NoBrackets,

    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} has rate {rate}; rates must be between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} has a maximum that does not exceed its minimum")]
    InvalidRange { index: usize },

    /// The bracket starts below the previous bracket's maximum.
    #[error("bracket {index} overlaps the previous bracket")]
    Overlap { index: usize },

    /// The bracket starts more than one currency unit above the previous maximum.
    #[error("bracket {index} leaves a gap after the previous bracket")]
    Gap { index: usize },

    #[error("bracket {index} is open-ended but is not the last bracket")]
    OpenBracketNotLast { index: usize },

    #[error("last bracket must be open-ended")]
    MissingOpenBracket,

    #[error("social security rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    #[error("social security income cap must be positive, got {0}")]
    InvalidSocialSecurityCap(Decimal),

    #[error("deduction '{name}' must be non-negative, got {amount}")]
    InvalidDeduction { name: String, amount: Decimal },

    #[error("invalid currency code '{0}'")]
    InvalidCurrency(String),
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

impl CountryTaxRules {
    /// Checks the bracket, deduction and social security invariants.
    ///
    /// Brackets must start at zero, ascend without overlapping, and end in a
    /// single open-ended bracket. Adjacent brackets may touch (`min` equal to
    /// the previous `max`) or use a whole-unit successor (`11000` then
    /// `11001`), so a gap of up to one currency unit is accepted.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleSetError`] found, checking in bracket order.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{CountryTaxRules, RuleSetError, TaxBracket};
    ///
    /// let rules = CountryTaxRules::new(
    ///     "USD",
    ///     vec![TaxBracket::new(dec!(0), Some(dec!(1000)), dec!(0.1))],
    /// );
    ///
    /// assert_eq!(rules.validate(), Err(RuleSetError::MissingOpenBracket));
    /// ```
    pub fn validate(&self) -> Result<(), RuleSetError> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RuleSetError::InvalidCurrency(self.currency.clone()));
        }

        let first = self.brackets.first().ok_or(RuleSetError::NoBrackets)?;
        if !first.min_income.is_zero() {
            return Err(RuleSetError::FirstBracketNotZero(first.min_income));
        }

        let last_index = self.brackets.len() - 1;
        let mut previous_max: Option<Decimal> = None;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if !is_fraction(bracket.tax_rate) {
                return Err(RuleSetError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }

            if index > 0 {
                // Every bracket before this one was checked to be closed.
                let prev = previous_max.unwrap_or(Decimal::ZERO);
                if bracket.min_income < prev {
                    return Err(RuleSetError::Overlap { index });
                }
                if bracket.min_income - prev > Decimal::ONE {
                    return Err(RuleSetError::Gap { index });
                }
            }

            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(RuleSetError::InvalidRange { index });
                }
                Some(max) => previous_max = Some(max),
                None if index != last_index => {
                    return Err(RuleSetError::OpenBracketNotLast { index });
                }
                None => previous_max = None,
            }
        }

        if previous_max.is_some() {
            return Err(RuleSetError::MissingOpenBracket);
        }

        for (name, amount) in &self.deductions {
            if *amount < Decimal::ZERO {
                return Err(RuleSetError::InvalidDeduction {
                    name: name.clone(),
                    amount: *amount,
                });
            }
        }

        if let Some(ss) = &self.social_security {
            for rate in [ss.employee_rate, ss.employer_rate] {
                if !is_fraction(rate) {
                    return Err(RuleSetError::InvalidSocialSecurityRate(rate));
                }
            }
            if let Some(cap) = ss.max_income {
                if cap <= Decimal::ZERO {
                    return Err(RuleSetError::InvalidSocialSecurityCap(cap));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{SocialSecurity, TaxBracket};

    fn two_bracket_rules() -> CountryTaxRules {
        CountryTaxRules::new(
            "USD",
            vec![
                TaxBracket::new(dec!(0), Some(dec!(10000)), dec!(0.10)),
                TaxBracket::new(dec!(10001), None, dec!(0.20)),
            ],
        )
    }

    #[test]
    fn validate_accepts_whole_unit_successor() {
        assert_eq!(two_bracket_rules().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_touching_brackets() {
        let mut rules = two_bracket_rules();
        rules.brackets[1].min_income = dec!(10000);

        assert_eq!(rules.validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_cent_successor() {
        let rules = CountryTaxRules::new(
            "BRL",
            vec![
                TaxBracket::new(dec!(0), Some(dec!(22847.76)), dec!(0)),
                TaxBracket::new(dec!(22847.77), None, dec!(0.075)),
            ],
        );

        assert_eq!(rules.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_brackets() {
        let rules = CountryTaxRules::new("USD", vec![]);

        assert_eq!(rules.validate(), Err(RuleSetError::NoBrackets));
    }

    #[test]
    fn validate_rejects_nonzero_start() {
        let mut rules = two_bracket_rules();
        rules.brackets[0].min_income = dec!(500);

        assert_eq!(rules.validate(), Err(RuleSetError::FirstBracketNotZero(dec!(500))));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut rules = two_bracket_rules();
        rules.brackets[1].tax_rate = dec!(1.5);

        assert_eq!(
            rules.validate(),
            Err(RuleSetError::InvalidRate {
                index: 1,
                rate: dec!(1.5)
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut rules = two_bracket_rules();
        rules.brackets[0].max_income = Some(dec!(0));

        assert_eq!(rules.validate(), Err(RuleSetError::InvalidRange { index: 0 }));
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut rules = two_bracket_rules();
        rules.brackets[1].min_income = dec!(9000);

        assert_eq!(rules.validate(), Err(RuleSetError::Overlap { index: 1 }));
    }

    #[test]
    fn validate_rejects_gap() {
        let mut rules = two_bracket_rules();
        rules.brackets[1].min_income = dec!(12000);

        assert_eq!(rules.validate(), Err(RuleSetError::Gap { index: 1 }));
    }

    #[test]
    fn validate_rejects_open_bracket_in_middle() {
        let rules = CountryTaxRules::new(
            "USD",
            vec![
                TaxBracket::new(dec!(0), None, dec!(0.10)),
                TaxBracket::new(dec!(10001), None, dec!(0.20)),
            ],
        );

        assert_eq!(rules.validate(), Err(RuleSetError::OpenBracketNotLast { index: 0 }));
    }

    #[test]
    fn validate_rejects_closed_last_bracket() {
        let mut rules = two_bracket_rules();
        rules.brackets[1].max_income = Some(dec!(50000));

        assert_eq!(rules.validate(), Err(RuleSetError::MissingOpenBracket));
    }

    #[test]
    fn validate_rejects_negative_deduction() {
        let rules = two_bracket_rules().with_standard_deduction(dec!(-1));

        assert_eq!(
            rules.validate(),
            Err(RuleSetError::InvalidDeduction {
                name: "standard".to_string(),
                amount: dec!(-1)
            })
        );
    }

    #[test]
    fn validate_rejects_bad_social_security() {
        let rules = two_bracket_rules().with_social_security(SocialSecurity {
            employee_rate: dec!(0.062),
            employer_rate: dec!(0.062),
            max_income: Some(dec!(0)),
        });

        assert_eq!(rules.validate(), Err(RuleSetError::InvalidSocialSecurityCap(dec!(0))));
    }

    #[test]
    fn validate_rejects_bad_currency() {
        let mut rules = two_bracket_rules();
        rules.currency = "US".to_string();

        assert_eq!(rules.validate(), Err(RuleSetError::InvalidCurrency("US".to_string())));
    }
}
