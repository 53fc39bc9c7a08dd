//! fifochain-report - FIFO cost-basis report for a conversion chain.

fn main() -> std::process::ExitCode {
    fifochain::cmd::report_cmd::main()
}
