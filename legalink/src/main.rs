use legalink::{command_argument_builder, mode_from_matches, options_from_matches, run};
use legalink_core::config::LogLevel;

fn init_tracing(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.tracing_level())
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let mode = mode_from_matches(&matches);
    let options = options_from_matches(&matches);
    init_tracing(options.log_level);

    let code = tokio::select! {
        result = run(mode, options) => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("ERROR ({}) {}", e.code(), e);
                e.code()
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("INFO (130) Halted via KeyboardInterrupt.");
            130
        }
    };

    std::process::exit(code);
}
