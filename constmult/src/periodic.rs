use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use shiftadd_dag::{Graph, NodeRef};

use crate::{build_tree, Error};

/// A constant made of a header followed by `repetitions()` copies of a period.
///
/// The period is stored with its `period_lsb_zeroes` trailing zeroes removed; the least
/// significant copy of the period is truncated by the same amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicConstant {
    pub header: BigUint,
    pub period: BigUint,
    pub period_lsb_zeroes: u32,
    pub period_size: u32,
    pub repeat_i: u32,
    pub repeat_j: Option<u32>,
}

/// The result of analyzing the binary expansion of a fraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fraction {
    pub constant: PeriodicConstant,
    /// Odd integer approximating the fraction; equal to `constant.value()`.
    pub significand: BigUint,
    /// The fraction is approximately `significand * 2^exponent`.
    pub exponent: i64,
}

fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// `header` followed by `repetitions` copies of the `period_size`-bit `period`.
fn concatenate(header: &BigUint, period: &BigUint, period_size: u32, repetitions: u64) -> BigUint {
    let body_size = repetitions * u64::from(period_size);
    // 1 + 2^p + 2^2p + ... spreads the period over every copy
    let ones = ((BigUint::one() << body_size) - 1u32) / ((BigUint::one() << period_size) - 1u32);
    (header << body_size) + period * ones
}

fn check_repetitions(period_size: u32, repeat_i: u32) -> Result<(), Error> {
    if repeat_i >= 31 || u64::from(period_size) << (repeat_i + 1) > u64::from(u32::MAX) {
        return Err(Error::InvalidPeriodicConstant("too many repetitions"));
    }
    Ok(())
}

impl PeriodicConstant {
    pub fn repetitions(&self) -> u64 {
        (1u64 << self.repeat_i) + self.repeat_j.map_or(0, |j| 1u64 << j)
    }

    /// Number of bits of the header followed by its repeated periods.
    pub fn width(&self) -> u64 {
        self.header.bits() + self.repetitions() * u64::from(self.period_size) - u64::from(self.period_lsb_zeroes)
    }

    pub fn value(&self) -> BigUint {
        let shifted_period = &self.period << self.period_lsb_zeroes;
        concatenate(&self.header, &shifted_period, self.period_size, self.repetitions()) >> self.period_lsb_zeroes
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.period.is_zero() {
            return Err(Error::InvalidPeriodicConstant("period must not be zero"));
        }
        if self.period_size == 0 {
            return Err(Error::InvalidPeriodicConstant("period size must not be zero"));
        }
        if self.period_lsb_zeroes >= self.period_size {
            return Err(Error::InvalidPeriodicConstant("period has more trailing zeroes than bits"));
        }
        if self.period.bits() + u64::from(self.period_lsb_zeroes) > u64::from(self.period_size) {
            return Err(Error::InvalidPeriodicConstant("period does not fit in the period size"));
        }
        if let Some(j) = self.repeat_j
            && j > self.repeat_i
        {
            return Err(Error::InvalidPeriodicConstant("repeat_j must not exceed repeat_i"));
        }
        check_repetitions(self.period_size, self.repeat_i)
    }

    /// Analyzes `a/b` and rounds it to a periodic constant with at least `precision` significant bits.
    ///
    /// The number of repetitions is rounded up to a sum of at most two powers of two.
    pub fn from_fraction(a: &BigUint, b: &BigUint, precision: u32) -> Result<Fraction, Error> {
        if b.is_zero() {
            return Err(Error::ZeroDenominator);
        }
        if a.is_zero() {
            return Err(Error::ZeroConstant);
        }
        let gcd = a.gcd(b);
        let mut a = a / &gcd;
        let mut b = b / &gcd;
        let mut exponent = 0i64;
        if let Some(zeroes) = a.trailing_zeros() {
            a >>= zeroes;
            exponent += zeroes as i64;
        }
        if let Some(zeroes) = b.trailing_zeros() {
            b >>= zeroes;
            exponent -= zeroes as i64;
        }
        if b.is_one() {
            return Err(Error::FiniteExpansion);
        }

        let (header, remainder) = a.div_rem(&b);
        let header_size = header.bits();
        tracing::debug!("header is {header:b} ({header_size} bits), remainder {remainder}/{b}");

        // the period is the multiplicative order of 2 modulo b
        let mut period_size = 1u32;
        let mut power = BigUint::from(2u32);
        while !(&power % &b).is_one() {
            period_size += 1;
            power <<= 1;
        }
        let mut period = remainder * &power / &b;
        tracing::debug!("period is {period:b} ({period_size} bits)");

        let needed = u64::from(precision).saturating_sub(header_size).div_ceil(u64::from(period_size)).max(1);
        let repeat_i = needed.ilog2();
        let rest = needed - (1u64 << repeat_i);
        let repeat_j = if rest == 0 { None } else { Some(bit_length(rest - 1)) };
        let repetitions = (1u64 << repeat_i) + repeat_j.map_or(0, |j| 1u64 << j);
        tracing::debug!("{needed} repetitions needed, rounded to {repetitions} (i = {repeat_i}, j = {repeat_j:?})");
        check_repetitions(period_size, repeat_i)?;

        let mut significand = concatenate(&header, &period, period_size, repetitions);
        exponent -= repetitions as i64 * i64::from(period_size);

        let mut period_lsb_zeroes = 0;
        while significand.is_even() {
            significand >>= 1;
            period >>= 1;
            period_lsb_zeroes += 1;
            exponent += 1;
        }

        let constant = PeriodicConstant {
            header,
            period,
            period_lsb_zeroes,
            period_size,
            repeat_i,
            repeat_j,
        };
        constant.validate()?;
        Ok(Fraction { constant, significand, exponent })
    }
}

/// Builds the multiplier for a periodic constant by doubling the number of periods at each level.
pub fn build_periodic(graph: &mut Graph, constant: &PeriodicConstant) -> Result<NodeRef, Error> {
    constant.validate()?;
    let size = constant.period_size;
    let i = constant.repeat_i;
    let zeroes = constant.period_lsb_zeroes;

    // powers[k] multiplies by 2^k copies of the period
    let mut powers = vec![build_tree(graph, &constant.period)?];
    for k in 1..=i {
        let previous = powers[k as usize - 1];
        powers.push(graph.add(previous, size << (k - 1), previous)?);
    }
    let power = |k: u32| powers[k as usize];

    let result = if constant.header.is_zero() {
        match constant.repeat_j {
            None => power(i),
            Some(j) => graph.add(power(j), size << i, power(i))?,
        }
    } else {
        let header = build_tree(graph, &constant.header)?;
        match constant.repeat_j {
            None => graph.add(header, (size << i) - zeroes, power(i))?,
            Some(j) if j == i => {
                let doubled = graph.add(power(i), size << i, power(i))?;
                graph.add(header, (size << (i + 1)) - zeroes, doubled)?
            }
            Some(j) => {
                let partial = graph.add(header, (size << j) - zeroes, power(j))?;
                graph.add(partial, size << i, power(i))?
            }
        }
    };
    Ok(result)
}
