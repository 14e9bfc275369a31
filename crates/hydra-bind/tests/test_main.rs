// Main test entry point for hydra-bind
// This file organizes and loads all test modules

mod common;

mod order_tests;
mod plan_tests;
