use num_bigint::{BigInt, BigUint};
use shiftadd_constmult::recode;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_recode_long_run() {
    init_logging();
    // 15 = 16 - 1 saves two additions at the price of a negation
    let recoding = recode(&BigUint::from(15u32));
    assert_eq!(recoding.to_string(), "+000-");
    assert_eq!(recoding.nonzero, 2);
    assert!(recoding.needs_negated_operand);
    assert_eq!(recoding.global_shift(), 0);
}

#[test]
fn test_recode_reverts_to_binary() {
    init_logging();
    // 6 = 8 - 2 needs a negation and is no better than 4 + 2
    let recoding = recode(&BigUint::from(6u32));
    assert_eq!(recoding.to_string(), "0++0");
    assert_eq!(recoding.nonzero, 2);
    assert!(!recoding.needs_negated_operand);
    assert_eq!(recoding.global_shift(), 1);

    let recoding = recode(&BigUint::from(7u32));
    assert_eq!(recoding.to_string(), "0+++");
    assert!(!recoding.needs_negated_operand);
}

#[test]
fn test_recode_value_and_no_regression() {
    init_logging();
    for n in 1u32..2048 {
        let constant = BigUint::from(n);
        let recoding = recode(&constant);
        assert_eq!(recoding.value(), BigInt::from(n), "recoding of {n} is {recoding}");
        assert!(recoding.digits.iter().all(|digit| (-1..=1).contains(digit)));
        assert_eq!(recoding.nonzero, recoding.digits.iter().filter(|&&digit| digit != 0).count());
        assert_eq!(recoding.needs_negated_operand, recoding.digits.contains(&-1));
        let weight = recoding.nonzero + usize::from(recoding.needs_negated_operand);
        assert!(weight <= n.count_ones() as usize, "recoding of {n} is {recoding}");
    }
}

#[test]
fn test_recode_large_constant() {
    init_logging();
    let constant: BigUint = (BigUint::from(1u32) << 100u32) - 1u32;
    let recoding = recode(&constant);
    assert_eq!(recoding.nonzero, 2);
    assert_eq!(recoding.value(), BigInt::from(constant));
}
