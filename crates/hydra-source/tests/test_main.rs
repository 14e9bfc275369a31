// Main test entry point for hydra-source
// This file organizes and loads all test modules

mod builder_tests;
mod unit_tests;
