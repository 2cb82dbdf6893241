//! Scenarios hosted by rstest: fixtures, cases and value matrices.
//!
//! Functions with parameters are registered with `#[rstest]` automatically,
//! so each case runs as its own test with its own scenario guard.

use gwt_bdd::{active_scenario, and, given, then, when};
use gwt_bdd_macros::scenario;
use rstest::fixture;

#[derive(Debug)]
struct Stack {
    items: Vec<u32>,
}

#[fixture]
fn empty_stack() -> Stack {
    Stack { items: Vec::new() }
}

#[scenario("Pushing onto an empty stack")]
fn pushing_onto_an_empty_stack(mut empty_stack: Stack) {
    given!("an empty stack");
    assert!(empty_stack.items.is_empty());
    when!("7 is pushed");
    empty_stack.items.push(7);
    then!("the stack holds one item");
    assert_eq!(empty_stack.items, vec![7]);
}

#[scenario("Popping returns the last item")]
#[case::one(&[1], Some(1))]
#[case::many(&[1, 2, 3], Some(3))]
#[case::none(&[], None)]
fn popping_returns_the_last_item(#[case] initial: &[u32], #[case] expected: Option<u32>) {
    given!("a stack holding {initial:?}");
    let mut stack = Stack {
        items: initial.to_vec(),
    };
    when!("an item is popped");
    let popped = stack.items.pop();
    then!("{expected:?} is returned");
    assert_eq!(popped, expected);
    and!("the scenario is still {:?}", active_scenario());
}

#[scenario("Each case gets a fresh scenario")]
fn each_case_gets_a_fresh_scenario(#[values(1, 2, 3)] value: u32) {
    given!("the value {value}");
    when!("it is doubled");
    then!("the result is {}", value * 2);
    assert_eq!(
        active_scenario().as_deref(),
        Some("Each case gets a fresh scenario")
    );
}

#[scenario("Fixtures and cases combine")]
#[case::small(10)]
#[case::large(1_000)]
fn fixtures_and_cases_combine(mut empty_stack: Stack, #[case] value: u32) {
    given!("an empty stack and the value {value}");
    when!("the value is pushed twice");
    empty_stack.items.extend([value, value]);
    then!("the stack sums to {}", value * 2);
    assert_eq!(empty_stack.items.iter().sum::<u32>(), value * 2);
}
