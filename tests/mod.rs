mod store_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - scenarios: The working hours editing scenarios end to end
// - store_tests: Schedule storage round trips
