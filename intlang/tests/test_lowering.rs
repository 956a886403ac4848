//! Property tests of expression lowering, run on the reference machine.
mod common;

use common::run;
use proptest::prelude::*;

/// Print the value of a single expression.
fn eval(expr: &str) -> i64 {
    let output = run(&format!("fn main() print({}) end", expr));
    assert_eq!(output.len(), 1);
    output[0]
}

#[test]
fn test_comparison_edges() {
    for (a, b) in [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1), (-3, -3)].iter() {
        assert_eq!(eval(&format!("{} < {}", a, b)), (a < b) as i64);
        assert_eq!(eval(&format!("{} = {}", a, b)), (a == b) as i64);
        assert_eq!(eval(&format!("{} >= {}", a, b)), (a >= b) as i64);
    }
}

#[test]
fn test_if_with_comparison() {
    let source = "
        fn max(a, b)
            m = b
            if a > b
                m = a
            end
            m
        end
        fn main()
            print(max(3, 9))
            print(max(9, 3))
            print(max(-4, -4))
        end
    ";
    assert_eq!(run(source), vec![9, 9, -4]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_arithmetic(a in -1000..1000_i64, b in -1000..1000_i64) {
        prop_assert_eq!(eval(&format!("{} + {}", a, b)), a + b);
        prop_assert_eq!(eval(&format!("{} - {}", a, b)), a - b);
        prop_assert_eq!(eval(&format!("{} * {}", a, b)), a * b);
    }

    #[test]
    fn test_division(a in -1000..1000_i64, b in 1..50_i64, negate in any::<bool>()) {
        let b = if negate { -b } else { b };
        prop_assert_eq!(eval(&format!("{} / {}", a, b)), a / b);
    }

    #[test]
    fn test_comparisons(a in -50..50_i64, b in -50..50_i64) {
        prop_assert_eq!(eval(&format!("{} < {}", a, b)), (a < b) as i64);
        prop_assert_eq!(eval(&format!("{} <= {}", a, b)), (a <= b) as i64);
        prop_assert_eq!(eval(&format!("{} = {}", a, b)), (a == b) as i64);
        prop_assert_eq!(eval(&format!("{} != {}", a, b)), (a != b) as i64);
        prop_assert_eq!(eval(&format!("{} > {}", a, b)), (a > b) as i64);
        prop_assert_eq!(eval(&format!("{} >= {}", a, b)), (a >= b) as i64);
    }

    #[test]
    fn test_branch_selection(cond in -3..3_i64, then_len in 0..5_usize, else_len in 0..5_usize) {
        // Bodies of varying length, each printing a marker per statement.
        let then_body = "print(1) ".repeat(then_len);
        let else_body = "print(2) ".repeat(else_len);
        let source = format!(
            "fn main() if {} {} else {} end print(3) end",
            cond, then_body, else_body
        );

        let mut expected = if cond > 0 {
            vec![1; then_len]
        } else {
            vec![2; else_len]
        };
        expected.push(3);
        prop_assert_eq!(run(&source), expected);
    }
}
