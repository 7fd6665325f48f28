//! Functional programming utilities.

/// Run the given closure when `predicate` holds, short-circuiting with its
/// error. Reads better than an `if` around every precondition check.
pub fn when<T, F>(predicate: bool, action: F) -> Result<(), T>
where
    F: FnOnce() -> Result<(), T>,
{
    if predicate {
        action()
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod fp_tests {
    use super::*;

    #[test]
    fn when_runs_action_only_on_true_predicate() {
        assert_eq!(when(false, || Err("boom")), Ok(()));
        assert_eq!(when(true, || Err("boom")), Err("boom"));
    }
}
