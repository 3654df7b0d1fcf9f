//! Unit tests for the environment guards.

use super::{lock, remove_var, set_var};

#[test]
fn set_var_restores_prior_value_on_drop() {
    let _held = lock();
    let _outer = set_var("STRATA_TEST_SET", "before");
    {
        let _inner = set_var("STRATA_TEST_SET", "after");
        assert_eq!(std::env::var("STRATA_TEST_SET").as_deref(), Ok("after"));
    }
    assert_eq!(std::env::var("STRATA_TEST_SET").as_deref(), Ok("before"));
}

#[test]
fn set_var_removes_a_previously_absent_key() {
    let _held = lock();
    {
        let _guard = set_var("STRATA_TEST_FRESH", "transient");
        assert!(std::env::var("STRATA_TEST_FRESH").is_ok());
    }
    assert!(std::env::var("STRATA_TEST_FRESH").is_err());
}

#[test]
fn remove_var_restores_the_removed_value() {
    let _held = lock();
    let _outer = set_var("STRATA_TEST_REMOVE", "kept");
    {
        let _inner = remove_var("STRATA_TEST_REMOVE");
        assert!(std::env::var("STRATA_TEST_REMOVE").is_err());
    }
    assert_eq!(std::env::var("STRATA_TEST_REMOVE").as_deref(), Ok("kept"));
}

#[test]
fn stacked_guards_restore_in_lifo_order() {
    let _held = lock();
    let first = set_var("STRATA_TEST_STACK", "one");
    let second = set_var("STRATA_TEST_STACK", "two");
    assert_eq!(std::env::var("STRATA_TEST_STACK").as_deref(), Ok("two"));
    drop(second);
    assert_eq!(std::env::var("STRATA_TEST_STACK").as_deref(), Ok("one"));
    drop(first);
    assert!(std::env::var("STRATA_TEST_STACK").is_err());
}
