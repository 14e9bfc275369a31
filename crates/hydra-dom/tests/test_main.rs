// Main test entry point for hydra-dom
// This file organizes and loads all test modules
