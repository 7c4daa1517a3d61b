use std::fmt::Display;

use num_bigint::{BigInt, BigUint};

/// A signed-digit representation of a positive constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recoding {
    /// Digits in `{-1, 0, 1}`, least significant first.
    pub digits: Vec<i8>,
    pub nonzero: usize,
    pub needs_negated_operand: bool,
}

impl Recoding {
    pub fn value(&self) -> BigInt {
        self.digits
            .iter()
            .enumerate()
            .filter(|&(_, &digit)| digit != 0)
            .map(|(position, &digit)| BigInt::from(digit) << position)
            .sum()
    }

    /// Position of the least significant nonzero digit.
    pub fn global_shift(&self) -> usize {
        self.digits.iter().position(|&digit| digit != 0).unwrap_or(0)
    }
}

impl Display for Recoding {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for &digit in self.digits.iter().rev() {
            let symbol = match digit {
                0 => '0',
                1 => '+',
                _ => '-',
            };
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// Booth-recodes `n`, falling back to plain binary when recoding saves no addition.
///
/// Needing `-x` costs one negation, which counts against the savings.
pub fn recode(n: &BigUint) -> Recoding {
    let size = n.bits() as usize;
    let binary: Vec<i8> = (0..=size).map(|index| i8::from(n.bit(index as u64))).collect();
    let nonzero_plain = binary.iter().filter(|&&bit| bit != 0).count();
    tracing::debug!("constant binary is {n:b} with {nonzero_plain} ones");

    let mut carry = vec![0i8; size + 1];
    let mut digits = vec![0i8; size + 1];
    for index in 0..size {
        if binary[index] + binary[index + 1] + carry[index] >= 2 {
            carry[index + 1] = 1;
        }
        digits[index] = binary[index] + carry[index] - 2 * carry[index + 1];
    }
    digits[size] = carry[size];

    let needs_negated_operand = digits.contains(&-1);
    let nonzero = digits.iter().filter(|&&digit| digit != 0).count();
    let recoding = Recoding { digits, nonzero, needs_negated_operand };
    tracing::debug!("booth recoding is {recoding} with {nonzero} non-zero digits");

    if nonzero + usize::from(needs_negated_operand) >= nonzero_plain {
        tracing::debug!("reverting to non-booth");
        return Recoding { digits: binary, nonzero: nonzero_plain, needs_negated_operand: false };
    }
    recoding
}
