use num_bigint::BigInt;
use shiftadd_constmult::{ConstMult, LinearTiming};
use shiftadd_json::export;

fn export_to_value(mult: &ConstMult) -> jzon::JsonValue {
    let mut output = Vec::new();
    export(&mut output, mult).unwrap();
    jzon::parse(&String::from_utf8(output).unwrap()).unwrap()
}

#[test]
fn test_export_five() {
    let mult = ConstMult::new(&BigInt::from(5), 8, &LinearTiming::combinatorial()).unwrap();
    let value = export_to_value(&mult);
    assert_eq!(value["name"].as_str(), Some("IntConstMult_8_5"));
    assert_eq!(value["constant"].as_str(), Some("5"));
    assert_eq!(value["input_width"].as_u32(), Some(8));
    assert_eq!(value["result_width"].as_u32(), Some(11));
    assert_eq!(value["total_cost"].as_u64(), Some(8));
    assert_eq!(value["dag_depth"].as_u32(), Some(1));
    assert_eq!(value["stages"].as_u32(), Some(1));
    assert_eq!(value["result"].as_usize(), Some(1));

    let operations = &value["operations"];
    assert_eq!(operations.len(), 2);
    assert_eq!(operations[0]["op"].as_str(), Some("x"));
    assert!(operations[0]["left"].is_null());
    assert_eq!(operations[1]["op"].as_str(), Some("add"));
    assert_eq!(operations[1]["value"].as_str(), Some("5"));
    assert_eq!(operations[1]["left"].as_usize(), Some(0));
    assert_eq!(operations[1]["right"].as_usize(), Some(0));
    assert_eq!(operations[1]["shift"].as_u32(), Some(2));
    assert_eq!(operations[1]["dedicated_adder"].as_bool(), Some(false));
    assert!(operations[1]["latency"].is_null());
}

#[test]
fn test_export_large_constant() {
    let constant = BigInt::parse_bytes(b"-123456789012345678901234567890", 10).unwrap();
    let mult = ConstMult::new(&constant, 12, &LinearTiming::default()).unwrap();
    let value = export_to_value(&mult);
    assert_eq!(value["constant"].as_str(), Some("-123456789012345678901234567890"));
    assert_eq!(value["name"].as_str(), Some("IntConstMult_12_M123456789012345678901234567890"));
    let operations = &value["operations"];
    assert_eq!(operations.len(), mult.schedule().entries().len());
    let last = &operations[operations.len() - 1];
    assert_eq!(last["op"].as_str(), Some("neg"));
    assert_eq!(last["value"].as_str(), Some("-123456789012345678901234567890"));
    assert_eq!(last["id"].as_usize(), value["result"].as_usize());
}
