mod config_io_tests;
mod config_validator_tests;
mod mapping_invariants_tests;
mod ring_buffer_tests;
