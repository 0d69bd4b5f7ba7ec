use std::process;

#[tokio::main]
async fn main() {
    match cpm_cli::main(std::env::args().collect::<Vec<String>>().as_slice()).await {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
