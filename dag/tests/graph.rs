use std::collections::HashSet;
use std::str::FromStr;

use num_bigint::BigInt;
use shiftadd_dag::{assert_isomorphic, Error, Graph, Op};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_identity() {
    let graph = Graph::new(8).unwrap();
    let x = graph.identity();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph[x].op(), Op::Identity);
    assert_eq!(graph[x].value(), &BigInt::from(1));
    assert_eq!(graph[x].bit_width(), 8);
    assert_eq!(graph[x].display_name(), "X");
    assert_eq!(Graph::new(0).unwrap_err(), Error::ZeroInputWidth);
}

#[test]
fn test_dedup_by_value() {
    init_logging();
    let mut graph = Graph::new(8).unwrap();
    let x = graph.identity();
    let three = graph.add(x, 1, x).unwrap();
    let six = graph.shift(three, 1).unwrap();
    // 6x = (x << 3) - (x << 1) computes the same constant
    let two = graph.shift(x, 1).unwrap();
    let also_six = graph.sub(x, 3, two).unwrap();
    assert_eq!(six, also_six);
    assert_eq!(graph.shift(x, 0).unwrap(), x);
    assert_eq!(graph.find(&BigInt::from(6)), Some(six));
    assert_eq!(graph[six].display_name(), "P6X");

    let values: HashSet<_> = graph.iter().map(|(_, node)| node.value().clone()).collect();
    assert_eq!(values.len(), graph.len());
}

#[test]
fn test_malformed_requests() {
    let mut graph = Graph::new(8).unwrap();
    let x = graph.identity();
    assert!(matches!(graph.provide(Op::Add, Some(x), 1, None), Err(Error::MalformedNodeRequest(_))));
    assert!(matches!(graph.provide(Op::Neg, Some(x), 0, Some(x)), Err(Error::MalformedNodeRequest(_))));
    assert!(matches!(graph.provide(Op::Shift, None, 1, None), Err(Error::MalformedNodeRequest(_))));
    assert!(matches!(graph.provide(Op::Identity, None, 0, None), Err(Error::MalformedNodeRequest(_))));
    assert!(matches!(graph.provide(Op::Neg, Some(x), 2, None), Err(Error::MalformedNodeRequest(_))));

    let other = Graph::from_str("%0:8 = x\n%1:9 = add %0 << 1, %0\n%2:10 = add %1 << 1, %0\n").unwrap();
    let foreign = other.find(&BigInt::from(7)).unwrap();
    assert!(matches!(graph.neg(foreign), Err(Error::MalformedNodeRequest(_))));
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_zero_shift_subtraction() {
    let mut graph = Graph::new(8).unwrap();
    let x = graph.identity();
    let three = graph.add(x, 1, x).unwrap();
    assert_eq!(graph.sub(three, 0, x), Err(Error::UnsupportedZeroShiftSubtraction(Op::Sub)));
    assert_eq!(graph.rsub(x, 0, three), Err(Error::UnsupportedZeroShiftSubtraction(Op::RSub)));
    // unshifted additions are fine
    let four = graph.add(three, 0, x).unwrap();
    assert_eq!(graph[four].value(), &BigInt::from(4));
}

#[test]
fn test_widths() {
    let mut graph = Graph::new(8).unwrap();
    let x = graph.identity();
    let minus_x = graph.neg(x).unwrap();
    assert_eq!(graph[minus_x].bit_width(), 9);
    assert_eq!(graph[minus_x].display_name(), "M1X");
    let five = graph.add(x, 2, x).unwrap();
    // 5 * 255 = 1275
    assert_eq!(graph[five].bit_width(), 11);
    assert_eq!(graph[five].cost(), 8);
    graph.set_result(five);
    assert_eq!(graph.result_width(), Some(11));
}

#[test]
fn test_evaluate() {
    let graph = Graph::from_str(concat!(
        "%0:4 = x\n",
        "%1:5 = neg %0\n",
        "%2:7 = add %0 << 2, %1\n",
        "%3:9 = add %2 << 2, %0\n",
        "result %3\n",
    ))
    .unwrap();
    assert_eq!(graph[graph.result().unwrap()].value(), &BigInt::from(13));
    for x in 0..16 {
        let x = BigInt::from(x);
        assert_eq!(graph.evaluate_result(&x), Some(&x * 13));
    }
}

#[test]
fn test_total_cost_counts_shared_nodes_once() {
    // 3x is used twice by 51x = (3x << 4) + 3x
    let mut graph = Graph::new(8).unwrap();
    let x = graph.identity();
    let three = graph.add(x, 1, x).unwrap();
    let fifty_one = graph.add(three, 4, three).unwrap();
    let three_cost = u64::from(graph[three].cost());
    let fifty_one_cost = u64::from(graph[fifty_one].cost());
    assert_eq!(graph.total_cost(fifty_one), three_cost + fifty_one_cost);
}

#[test]
fn test_print_parse() {
    init_logging();
    let mut graph = Graph::new(8).unwrap();
    let x = graph.identity();
    let minus_x = graph.neg(x).unwrap();
    let seven = graph.add(x, 3, minus_x).unwrap();
    let result = graph.shift(seven, 2).unwrap();
    graph.set_result(result);
    assert_eq!(
        graph.to_string(),
        concat!(
            "%0:8 = x\n",
            "%1:9 = neg %0\n",
            "%2:11 = add %0 << 3, %1\n",
            "%3:13 = shift %2 << 2\n",
            "result %3\n",
        )
    );
    let parsed = Graph::from_str(&graph.to_string()).unwrap();
    assert_isomorphic!(graph, parsed);
}

#[test]
fn test_parse_labels_and_comments() {
    let graph = Graph::from_str(concat!(
        "; multiply by 28\n",
        "%10:8 = x\n",
        "%20:9 = neg %10 ; minus x\n",
        "\n",
        "%30:11 = add %10 << 3, %20\n",
        "%40:13 = shift %30 << 2\n",
        "result %40\n",
    ))
    .unwrap();
    assert_eq!(graph.evaluate_result(&BigInt::from(3)), Some(BigInt::from(84)));
}

#[test]
fn test_parse_errors() {
    let error = Graph::from_str("%0:8 = x\n%1:9 = add %0 << 1\n").unwrap_err();
    assert_eq!(error.line, 2);
    let error = Graph::from_str("%1:9 = neg %0\n").unwrap_err();
    assert_eq!(error.line, 1);
    let error = Graph::from_str("%0:8 = x\n%1:9 = neg %2\n").unwrap_err();
    assert_eq!(error.line, 2);
    let error = Graph::from_str("%0:8 = x\n%1:9 = mul %0 << 1, %0\n").unwrap_err();
    assert_eq!(error.line, 2);
    let error = Graph::from_str("%0:8 = x\n%1:9 = sub %0, %0\n").unwrap_err();
    assert!(error.message.contains("unimplemented"));
}

#[test]
fn test_parse_rejects_value_collision() {
    // 4x - x is 3x, already defined by the add
    let error = Graph::from_str(concat!(
        "%0:8 = x\n",
        "%1:10 = add %0 << 1, %0\n",
        "%2:11 = sub %0 << 2, %0\n",
        "result %2\n",
    ))
    .unwrap_err();
    assert_eq!(error.line, 3);
    assert!(error.message.contains("same value"));
    let error = Graph::from_str("%0:8 = x\n%1:8 = shift %0 << 0\n").unwrap_err();
    assert_eq!(error.line, 2);
}

#[test]
fn test_parse_repeated_definition_is_an_alias() {
    let graph = Graph::from_str(concat!(
        "%0:8 = x\n",
        "%1:10 = add %0 << 1, %0\n",
        "%2:10 = add %0 << 1, %0\n",
        "%3:12 = add %1 << 2, %2\n",
        "result %3\n",
    ))
    .unwrap();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.evaluate_result(&BigInt::from(1)), Some(BigInt::from(15)));
}

#[test]
fn test_not_isomorphic() {
    let lft = Graph::from_str("%0:8 = x\n%1:10 = add %0 << 1, %0\n%2:11 = shift %1 << 1\nresult %2\n").unwrap();
    let rgt = Graph::from_str("%0:8 = x\n%1:10 = shift %0 << 1\n%2:11 = add %0 << 2, %1\nresult %2\n").unwrap();
    assert!(shiftadd_dag::isomorphic(&lft, &rgt).is_err());
    assert!(shiftadd_dag::isomorphic(&lft, &lft).is_ok());
}
