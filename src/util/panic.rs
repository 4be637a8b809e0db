/// Asserts that evaluating the provided block panics, for testing contract violations that are
/// required to fail loudly rather than return an error.
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "expression failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(std::panic::catch_unwind(|| $run).is_err(), $msg);
    };
}

pub(crate) use assert_panics;
