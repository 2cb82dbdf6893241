//! Scenarios on async tests driven by `#[tokio::test]`.
//!
//! The guard is `!Send`, so these tests run on tokio's current-thread
//! runtime, which keeps the whole body on the test thread.

use gwt_bdd::{active_scenario, given, then, when};
use gwt_bdd_macros::scenario;

async fn fetch_balance() -> u32 {
    tokio::task::yield_now().await;
    100
}

#[scenario("Async balance lookup")]
#[tokio::test]
async fn async_balance_lookup() {
    given!("an account service");
    when!("the balance is fetched");
    let balance = fetch_balance().await;
    then!("the balance is {balance}");
    assert_eq!(balance, 100);
    assert_eq!(active_scenario().as_deref(), Some("Async balance lookup"));
}

#[scenario("Async scenario missing its outcome")]
#[tokio::test]
#[should_panic(expected = "THEN clause missing.")]
async fn async_scenario_missing_its_outcome() {
    given!("an account service");
    when!("the balance is fetched");
    let _ = fetch_balance().await;
}
