mod context_tests;
mod operators_tests;
