// Send one ICMP echo request and print the echoed payload.
//
// Usage: pingwire <address> [timeout-seconds]
//
// Needs CAP_NET_RAW (or root) for the raw socket. Log level via RUST_LOG.

use std::process::ExitCode;

use log::error;

const DEFAULT_TIMEOUT_SECS: u64 = 3;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        let prog = args.first().map(String::as_str).unwrap_or("pingwire");
        eprintln!("Usage: {} <address> [timeout-seconds]", prog);
        return ExitCode::from(2);
    }

    let address = &args[1];
    let timeout = match args.get(2).map(|s| s.parse::<u64>()) {
        None => DEFAULT_TIMEOUT_SECS,
        Some(Ok(secs)) if secs > 0 => secs,
        Some(_) => {
            eprintln!("invalid timeout: {}", args[2]);
            return ExitCode::from(2);
        }
    };

    match pingwire::ping(address, timeout) {
        Ok(payload) => {
            println!("{}", String::from_utf8_lossy(&payload));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("ping {} failed: {}", address, e);
            ExitCode::FAILURE
        }
    }
}
