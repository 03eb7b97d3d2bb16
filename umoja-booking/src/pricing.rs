use serde::Serialize;

/// Children travel at 60% of the adult per-person rate.
pub const CHILD_RATE: f64 = 0.6;

/// Informational payment split shown at confirmation: 20% deposit now,
/// 80% balance on arrival.
pub const DEPOSIT_RATE: f64 = 0.2;

/// Derived price breakdown for a draft against a selected catalog item.
/// Pure data: recomputed on demand, never cached or persisted mid-flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub total: f64,
    pub deposit: f64,
    pub balance: f64,
}

impl PriceQuote {
    /// `total = adult_price * adults + adult_price * CHILD_RATE * children`.
    /// No rounding here; formatting to 2 decimal places is display-time
    /// only.
    pub fn compute(adult_price: f64, adults: u32, children: u32) -> Self {
        let total =
            adult_price * adults as f64 + adult_price * CHILD_RATE * children as f64;
        Self {
            total,
            deposit: total * DEPOSIT_RATE,
            balance: total * (1.0 - DEPOSIT_RATE),
        }
    }

    pub fn display_total(&self) -> String {
        format!("{:.2}", self.total)
    }

    pub fn display_deposit(&self) -> String {
        format!("{:.2}", self.deposit)
    }

    pub fn display_balance(&self) -> String {
        format!("{:.2}", self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn two_adults_one_child_at_249() {
        let quote = PriceQuote::compute(249.0, 2, 1);
        assert!((quote.total - 647.40).abs() < EPS);
        assert_eq!(quote.display_total(), "647.40");
    }

    #[test]
    fn deposit_and_balance_split_20_80() {
        let quote = PriceQuote::compute(100.0, 1, 0);
        assert!((quote.deposit - 20.0).abs() < EPS);
        assert!((quote.balance - 80.0).abs() < EPS);
        assert!((quote.deposit + quote.balance - quote.total).abs() < EPS);
    }

    #[test]
    fn total_is_monotone_in_both_counts() {
        let base = PriceQuote::compute(179.0, 1, 0).total;
        for adults in 1..6u32 {
            for children in 0..6u32 {
                let here = PriceQuote::compute(179.0, adults, children).total;
                assert!(here + EPS >= base);
                let more_adults = PriceQuote::compute(179.0, adults + 1, children).total;
                let more_children = PriceQuote::compute(179.0, adults, children + 1).total;
                assert!(more_adults >= here);
                assert!(more_children >= here);
            }
        }
    }

    #[test]
    fn recomputation_is_idempotent() {
        let a = PriceQuote::compute(320.0, 3, 2);
        let b = PriceQuote::compute(320.0, 3, 2);
        assert_eq!(a, b);
    }
}
