mod store_tests;
mod support;
