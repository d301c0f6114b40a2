//! Embedded country tax schedules.
//!
//! Thresholds are in each country's own currency. Adjacent brackets use
//! whole-unit successors (`11000` then `11001`) as published, so the unit
//! between them is untaxed; see [`CountryTaxRules::validate`].

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::RuleStore;
use crate::models::{CountryTaxRules, SocialSecurity, TaxBracket};

pub(super) static BUILTIN_RULES: LazyLock<RuleStore> = LazyLock::new(|| {
    let mut store = RuleStore::new();
    for (code, rules) in countries() {
        // Covered by `every_builtin_rule_set_is_valid`.
        store
            .insert(code, rules)
            .unwrap_or_else(|e| panic!("built-in rules for {code} are invalid: {e}"));
    }
    store
});

type Row = (Decimal, Option<Decimal>, Decimal);

fn brackets(rows: &[Row]) -> Vec<TaxBracket> {
    rows.iter()
        .map(|&(min, max, rate)| TaxBracket::new(min, max, rate))
        .collect()
}

fn social_security(
    employee_rate: Decimal,
    employer_rate: Decimal,
    max_income: Option<Decimal>,
) -> SocialSecurity {
    SocialSecurity {
        employee_rate,
        employer_rate,
        max_income,
    }
}

fn no_income_tax(currency: &str) -> CountryTaxRules {
    CountryTaxRules::new(currency, brackets(&[(dec!(0), None, dec!(0))]))
}

fn countries() -> Vec<(&'static str, CountryTaxRules)> {
    vec![
        // North America
        (
            "US",
            CountryTaxRules::new(
                "USD",
                brackets(&[
                    (dec!(0), Some(dec!(11000)), dec!(0.10)),
                    (dec!(11001), Some(dec!(44725)), dec!(0.12)),
                    (dec!(44726), Some(dec!(95375)), dec!(0.22)),
                    (dec!(95376), Some(dec!(182100)), dec!(0.24)),
                    (dec!(182101), Some(dec!(231250)), dec!(0.32)),
                    (dec!(231251), Some(dec!(578125)), dec!(0.35)),
                    (dec!(578126), None, dec!(0.37)),
                ]),
            )
            .with_standard_deduction(dec!(13850))
            .with_social_security(social_security(dec!(0.062), dec!(0.062), Some(dec!(160200)))),
        ),
        (
            "UK",
            CountryTaxRules::new(
                "GBP",
                brackets(&[
                    (dec!(0), Some(dec!(12570)), dec!(0)),
                    (dec!(12571), Some(dec!(50270)), dec!(0.20)),
                    (dec!(50271), Some(dec!(125140)), dec!(0.40)),
                    (dec!(125141), None, dec!(0.45)),
                ]),
            )
            .with_standard_deduction(dec!(12570)),
        ),
        (
            "GERMANY",
            CountryTaxRules::new(
                "EUR",
                brackets(&[
                    (dec!(0), Some(dec!(10908)), dec!(0)),
                    (dec!(10909), Some(dec!(62809)), dec!(0.14)),
                    (dec!(62810), Some(dec!(277825)), dec!(0.42)),
                    (dec!(277826), None, dec!(0.45)),
                ]),
            )
            .with_social_security(social_security(dec!(0.195), dec!(0.195), Some(dec!(87600)))),
        ),
        (
            "CANADA",
            CountryTaxRules::new(
                "CAD",
                brackets(&[
                    (dec!(0), Some(dec!(53359)), dec!(0.15)),
                    (dec!(53360), Some(dec!(106717)), dec!(0.205)),
                    (dec!(106718), Some(dec!(165430)), dec!(0.26)),
                    (dec!(165431), Some(dec!(235675)), dec!(0.29)),
                    (dec!(235676), None, dec!(0.33)),
                ]),
            )
            .with_standard_deduction(dec!(15000)),
        ),
        (
            "MEXICO",
            CountryTaxRules::new(
                "MXN",
                brackets(&[
                    (dec!(0), Some(dec!(7735)), dec!(0.0192)),
                    (dec!(7736), Some(dec!(65651)), dec!(0.064)),
                    (dec!(65652), Some(dec!(115375)), dec!(0.1088)),
                    (dec!(115376), Some(dec!(134119)), dec!(0.16)),
                    (dec!(134120), Some(dec!(160577)), dec!(0.1792)),
                    (dec!(160578), Some(dec!(323862)), dec!(0.2136)),
                    (dec!(323863), None, dec!(0.35)),
                ]),
            ),
        ),
        // Europe
        (
            "FRANCE",
            CountryTaxRules::new(
                "EUR",
                brackets(&[
                    (dec!(0), Some(dec!(10777)), dec!(0)),
                    (dec!(10778), Some(dec!(27478)), dec!(0.11)),
                    (dec!(27479), Some(dec!(78570)), dec!(0.30)),
                    (dec!(78571), Some(dec!(168994)), dec!(0.41)),
                    (dec!(168995), None, dec!(0.45)),
                ]),
            )
            .with_social_security(social_security(dec!(0.22), dec!(0.45), None)),
        ),
        (
            "ITALY",
            CountryTaxRules::new(
                "EUR",
                brackets(&[
                    (dec!(0), Some(dec!(15000)), dec!(0.23)),
                    (dec!(15001), Some(dec!(28000)), dec!(0.25)),
                    (dec!(28001), Some(dec!(50000)), dec!(0.35)),
                    (dec!(50001), None, dec!(0.43)),
                ]),
            )
            .with_social_security(social_security(dec!(0.10), dec!(0.30), None)),
        ),
        (
            "SPAIN",
            CountryTaxRules::new(
                "EUR",
                brackets(&[
                    (dec!(0), Some(dec!(12450)), dec!(0.19)),
                    (dec!(12451), Some(dec!(20200)), dec!(0.24)),
                    (dec!(20201), Some(dec!(35200)), dec!(0.30)),
                    (dec!(35201), Some(dec!(60000)), dec!(0.37)),
                    (dec!(60001), None, dec!(0.45)),
                ]),
            ),
        ),
        // Asia
        (
            "JAPAN",
            CountryTaxRules::new(
                "JPY",
                brackets(&[
                    (dec!(0), Some(dec!(1950000)), dec!(0.05)),
                    (dec!(1950001), Some(dec!(3300000)), dec!(0.10)),
                    (dec!(3300001), Some(dec!(6950000)), dec!(0.20)),
                    (dec!(6950001), Some(dec!(9000000)), dec!(0.23)),
                    (dec!(9000001), Some(dec!(18000000)), dec!(0.33)),
                    (dec!(18000001), Some(dec!(40000000)), dec!(0.40)),
                    (dec!(40000001), None, dec!(0.45)),
                ]),
            )
            .with_social_security(social_security(dec!(0.143), dec!(0.143), None)),
        ),
        (
            "CHINA",
            CountryTaxRules::new(
                "CNY",
                brackets(&[
                    (dec!(0), Some(dec!(36000)), dec!(0.03)),
                    (dec!(36001), Some(dec!(144000)), dec!(0.10)),
                    (dec!(144001), Some(dec!(300000)), dec!(0.20)),
                    (dec!(300001), Some(dec!(420000)), dec!(0.25)),
                    (dec!(420001), Some(dec!(660000)), dec!(0.30)),
                    (dec!(660001), Some(dec!(960000)), dec!(0.35)),
                    (dec!(960001), None, dec!(0.45)),
                ]),
            )
            .with_social_security(social_security(dec!(0.11), dec!(0.29), None)),
        ),
        (
            "INDIA",
            CountryTaxRules::new(
                "INR",
                brackets(&[
                    (dec!(0), Some(dec!(300000)), dec!(0)),
                    (dec!(300001), Some(dec!(600000)), dec!(0.05)),
                    (dec!(600001), Some(dec!(900000)), dec!(0.10)),
                    (dec!(900001), Some(dec!(1200000)), dec!(0.15)),
                    (dec!(1200001), Some(dec!(1500000)), dec!(0.20)),
                    (dec!(1500001), None, dec!(0.30)),
                ]),
            )
            .with_standard_deduction(dec!(50000))
            // Provident fund contribution
            .with_social_security(social_security(dec!(0.12), dec!(0.12), None)),
        ),
        (
            "SINGAPORE",
            CountryTaxRules::new(
                "SGD",
                brackets(&[
                    (dec!(0), Some(dec!(20000)), dec!(0)),
                    (dec!(20001), Some(dec!(30000)), dec!(0.02)),
                    (dec!(30001), Some(dec!(40000)), dec!(0.035)),
                    (dec!(40001), Some(dec!(80000)), dec!(0.07)),
                    (dec!(80001), Some(dec!(120000)), dec!(0.115)),
                    (dec!(120001), Some(dec!(160000)), dec!(0.15)),
                    (dec!(160001), Some(dec!(200000)), dec!(0.18)),
                    (dec!(200001), Some(dec!(240000)), dec!(0.19)),
                    (dec!(240001), Some(dec!(280000)), dec!(0.195)),
                    (dec!(280001), Some(dec!(320000)), dec!(0.20)),
                    (dec!(320001), None, dec!(0.22)),
                ]),
            ),
        ),
        // Oceania
        (
            "AUSTRALIA",
            CountryTaxRules::new(
                "AUD",
                brackets(&[
                    (dec!(0), Some(dec!(18200)), dec!(0)),
                    (dec!(18201), Some(dec!(45000)), dec!(0.19)),
                    (dec!(45001), Some(dec!(120000)), dec!(0.325)),
                    (dec!(120001), Some(dec!(180000)), dec!(0.37)),
                    (dec!(180001), None, dec!(0.45)),
                ]),
            ),
        ),
        (
            "NEWZEALAND",
            CountryTaxRules::new(
                "NZD",
                brackets(&[
                    (dec!(0), Some(dec!(14000)), dec!(0.105)),
                    (dec!(14001), Some(dec!(48000)), dec!(0.175)),
                    (dec!(48001), Some(dec!(70000)), dec!(0.30)),
                    (dec!(70001), Some(dec!(180000)), dec!(0.33)),
                    (dec!(180001), None, dec!(0.39)),
                ]),
            ),
        ),
        // South America
        (
            "BRAZIL",
            CountryTaxRules::new(
                "BRL",
                brackets(&[
                    (dec!(0), Some(dec!(22847.76)), dec!(0)),
                    (dec!(22847.77), Some(dec!(33919.80)), dec!(0.075)),
                    (dec!(33919.81), Some(dec!(45012.60)), dec!(0.15)),
                    (dec!(45012.61), Some(dec!(55976.16)), dec!(0.225)),
                    (dec!(55976.17), None, dec!(0.275)),
                ]),
            ),
        ),
        (
            "ARGENTINA",
            CountryTaxRules::new(
                "ARS",
                brackets(&[
                    (dec!(0), Some(dec!(64532)), dec!(0.05)),
                    (dec!(64533), Some(dec!(129064)), dec!(0.09)),
                    (dec!(129065), Some(dec!(193596)), dec!(0.12)),
                    (dec!(193597), Some(dec!(258128)), dec!(0.15)),
                    (dec!(258129), Some(dec!(322660)), dec!(0.19)),
                    (dec!(322661), Some(dec!(387192)), dec!(0.23)),
                    (dec!(387193), Some(dec!(451724)), dec!(0.27)),
                    (dec!(451725), Some(dec!(516256)), dec!(0.31)),
                    (dec!(516257), None, dec!(0.35)),
                ]),
            ),
        ),
        // Africa
        (
            "SOUTHAFRICA",
            CountryTaxRules::new(
                "ZAR",
                brackets(&[
                    (dec!(0), Some(dec!(237100)), dec!(0.18)),
                    (dec!(237101), Some(dec!(370500)), dec!(0.26)),
                    (dec!(370501), Some(dec!(512800)), dec!(0.31)),
                    (dec!(512801), Some(dec!(673000)), dec!(0.36)),
                    (dec!(673001), Some(dec!(857900)), dec!(0.39)),
                    (dec!(857901), Some(dec!(1817000)), dec!(0.41)),
                    (dec!(1817001), None, dec!(0.45)),
                ]),
            ),
        ),
        (
            "NIGERIA",
            CountryTaxRules::new(
                "NGN",
                brackets(&[
                    (dec!(0), Some(dec!(300000)), dec!(0.07)),
                    (dec!(300001), Some(dec!(600000)), dec!(0.11)),
                    (dec!(600001), Some(dec!(1100000)), dec!(0.15)),
                    (dec!(1100001), Some(dec!(1600000)), dec!(0.19)),
                    (dec!(1600001), Some(dec!(3200000)), dec!(0.21)),
                    (dec!(3200001), None, dec!(0.24)),
                ]),
            ),
        ),
        // Middle East
        ("UAE", no_income_tax("AED")),
        ("SAUDIARABIA", no_income_tax("SAR")),
        (
            "ISRAEL",
            CountryTaxRules::new(
                "ILS",
                brackets(&[
                    (dec!(0), Some(dec!(77400)), dec!(0.10)),
                    (dec!(77401), Some(dec!(110880)), dec!(0.14)),
                    (dec!(110881), Some(dec!(178080)), dec!(0.20)),
                    (dec!(178081), Some(dec!(247440)), dec!(0.31)),
                    (dec!(247441), Some(dec!(514920)), dec!(0.35)),
                    (dec!(514921), Some(dec!(663240)), dec!(0.47)),
                    (dec!(663241), None, dec!(0.50)),
                ]),
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_builtin_rule_set_is_valid() {
        for (code, rules) in countries() {
            assert_eq!(rules.validate(), Ok(()), "rules for {code}");
        }
    }

    #[test]
    fn builtin_store_has_every_country() {
        let store = RuleStore::builtin();

        assert_eq!(store.len(), 21);
        assert!(store.contains("US"));
        assert!(store.contains("newzealand"));
        assert!(store.contains("SaudiArabia"));
    }

    #[test]
    fn us_rules_match_published_schedule() {
        let us = RuleStore::builtin().get("US").unwrap();

        assert_eq!(us.currency, "USD");
        assert_eq!(us.brackets.len(), 7);
        assert_eq!(us.brackets[0].tax_rate, dec!(0.10));
        assert_eq!(us.brackets[6].max_income, None);
        assert_eq!(us.standard_deduction(), dec!(13850));
        assert_eq!(
            us.social_security,
            Some(SocialSecurity {
                employee_rate: dec!(0.062),
                employer_rate: dec!(0.062),
                max_income: Some(dec!(160200)),
            })
        );
    }

    #[test]
    fn no_bracket_list_exceeds_eleven_entries() {
        let store = RuleStore::builtin();

        for code in store.available_countries() {
            assert!(store.get(code).unwrap().brackets.len() <= 11, "{code}");
        }
    }
}
