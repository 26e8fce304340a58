#![cfg(unix)]

#[path = "../util/mod.rs"]
#[macro_use]
mod util;
use util::*;

mod nonblocking;
mod stream;

#[test]
fn pipe_stream_fidelity() -> TestResult {
    testinit();
    stream::fidelity()
}
#[test]
fn pipe_chunked_read_scenario() -> TestResult {
    testinit();
    stream::chunked_read_scenario()
}
#[test]
fn pipe_close_semantics() -> TestResult {
    testinit();
    lifecycle::close_is_idempotent_and_terminal()
}
#[test]
fn pipe_sink_close_wakes_blocked_reader() -> TestResult {
    testinit();
    lifecycle::sink_close_wakes_blocked_reader()
}
#[test]
fn pipe_close_unblocks_pending_read() -> TestResult {
    testinit();
    lifecycle::close_unblocks_pending_read()
}
#[test]
fn pipe_close_unblocks_pending_write() -> TestResult {
    testinit();
    lifecycle::close_unblocks_pending_write()
}
#[test]
fn pipe_write_without_reader_breaks() -> TestResult {
    testinit();
    lifecycle::write_without_reader_breaks()
}
#[test]
fn pipe_nonblocking_read_signals_would_block() -> TestResult {
    testinit();
    nonblocking::read_signals_would_block()
}
#[test]
fn pipe_nonblocking_mode_is_reversible() -> TestResult {
    testinit();
    nonblocking::mode_is_reversible()
}
#[test]
fn pipe_available_reports_buffered_bytes() -> TestResult {
    testinit();
    nonblocking::available_reports_buffered_bytes()
}
