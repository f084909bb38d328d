mod cli;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        let message = e.to_string();
        eprintln!("Error: {}", message);

        // Most wrappers already inline their cause; print only what is new.
        let mut source = e.source();
        while let Some(cause) = source {
            let cause_message = cause.to_string();
            if !message.contains(&cause_message) {
                eprintln!("  caused by: {}", cause_message);
            }
            source = cause.source();
        }
        std::process::exit(1);
    }
}
