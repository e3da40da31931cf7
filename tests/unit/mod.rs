/// Unit test target: engine behavior through the public API
mod engine_tests;
