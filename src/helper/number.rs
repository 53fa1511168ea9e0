use std::cmp::Ordering;

use rust_decimal::Decimal;

pub trait Sign {
    fn sign(&self) -> Ordering;
}

impl Sign for Decimal {
    fn sign(&self) -> Ordering {
        self.cmp(&Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::Sign;
    use rust_decimal_macros::dec;
    use std::cmp::Ordering;

    #[test]
    fn decimal_sign() {
        assert_eq!(dec!(2.15).sign(), Ordering::Greater);
        assert_eq!(dec!(-0.01).sign(), Ordering::Less);
        assert_eq!(dec!(0.00).sign(), Ordering::Equal);
    }
}
